use clap::{Parser, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

use crate::config::parse_provider;

/// AI travel assistant combining live weather and top attractions
#[derive(Parser, Debug)]
#[command(
    name = "tripbrief",
    about = "AI travel assistant combining live weather and top attractions",
    version,
    author,
    long_about = "tripbrief asks an LLM agent to look up the weather forecast and the top \
                  attractions for a destination, then prints a short practical briefing. \
                  The raw agent trace is saved as JSON next to it.\n\n\
                  Examples:\n  \
                  tripbrief Paris\n  \
                  tripbrief San Francisco\n  \
                  tripbrief --backend openai --model gpt-4o-mini Tokyo\n  \
                  tripbrief --format json Lisbon"
)]
pub struct CliArgs {
    #[arg(
        value_name = "DESTINATION",
        help = "Destination to brief (multiple words are joined); prompts when omitted"
    )]
    pub destination: Vec<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "LLM provider (default: TRIPBRIEF_PROVIDER or gemini)"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name to use (provider-specific, e.g. 'gemini-2.0-flash')"
    )]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "N", help = "Maximum LLM turns per run")]
    pub max_iterations: Option<usize>,

    #[arg(long, value_name = "N", help = "Maximum attraction search results")]
    pub max_results: Option<usize>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory for the agent trace file"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Verbose logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Words joined by single spaces, `None` when nothing was given
    pub fn destination(&self) -> Option<String> {
        let joined = self
            .destination
            .iter()
            .flat_map(|word| word.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    parse_provider(s).map_err(|e| e.to_string())
}
