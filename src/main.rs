use tripbrief::cli::{CliArgs, OutputFormatter};
use tripbrief::config::TravelConfig;
use tripbrief::llm::select_llm_client;
use tripbrief::pipeline::{write_trace, TravelOrchestrator};
use tripbrief::progress::LoggingHandler;
use tripbrief::util::logging::{self, parse_level};
use tripbrief::{NAME, VERSION};

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info, Level};

const DESTINATION_PROMPT: &str = "Enter a destination city (e.g., 'Paris'): ";

#[tokio::main]
async fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };
    let env_config = TravelConfig::from_env();
    init_logging_from_args(&args, &env_config);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match handle_run(&args, env_config).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &TravelConfig) {
    let mut logging_config = logging::config_from_env();

    logging_config.level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    logging::init_logging(logging_config);
}

/// Applies command-line overrides on top of the environment configuration
fn apply_overrides(args: &CliArgs, mut config: TravelConfig) -> TravelConfig {
    if let Some(provider) = args.backend {
        debug!("Provider explicitly set to: {:?}", provider);
        config = config.with_provider(provider, false);
    }
    if let Some(model) = &args.model {
        debug!("Model overridden to: {}", model);
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(max_results) = args.max_results {
        config.max_results = max_results;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }
    config
}

fn read_destination(args: &CliArgs) -> Result<String> {
    if let Some(destination) = args.destination() {
        return Ok(destination);
    }

    if atty::is(atty::Stream::Stdin) {
        print!("{}", DESTINATION_PROMPT);
        io::stdout().flush().context("Failed to flush prompt")?;
    }

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read destination from stdin")?;

    let destination = line.split_whitespace().collect::<Vec<_>>().join(" ");
    if destination.is_empty() {
        bail!("No destination provided.");
    }
    Ok(destination)
}

async fn handle_run(args: &CliArgs, env_config: TravelConfig) -> Result<()> {
    let config = apply_overrides(args, env_config);
    config.validate().context("Configuration error")?;
    debug!("{}", config);

    let destination = read_destination(args)?;
    info!(destination = %destination, "Preparing travel briefing");

    let selected = select_llm_client(&config).context("Failed to initialize LLM client")?;
    info!("Using {}", selected.description);

    let orchestrator =
        TravelOrchestrator::from_config(&config, selected.client, Arc::new(LoggingHandler))
            .context("Failed to initialize tools")?;

    let report = orchestrator
        .run(&destination)
        .await
        .with_context(|| format!("Travel assistant failed for '{}'", destination))?;

    let trace_path = write_trace(&config.output_dir, &report.destination, &report.trace)
        .context("Failed to save agent output")?;

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format(&report, &trace_path)?);

    Ok(())
}
