//! tripbrief - AI travel assistant
//!
//! An LLM agent is given two tools, a WeatherAPI.com forecast lookup and a
//! DuckDuckGo attraction search. It decides when to call them and then writes a
//! short, practical briefing for the destination. Every run is recorded as an
//! [`pipeline::AgentTrace`] that the CLI saves as JSON.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tripbrief::llm::select_llm_client;
//! use tripbrief::pipeline::TravelOrchestrator;
//! use tripbrief::progress::LoggingHandler;
//! use tripbrief::TravelConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = TravelConfig::from_env();
//! config.validate()?;
//!
//! let selected = select_llm_client(&config)?;
//! let orchestrator =
//!     TravelOrchestrator::from_config(&config, selected.client, Arc::new(LoggingHandler))?;
//!
//! let report = orchestrator.run("Paris").await?;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`llm`]: provider-independent chat types and the genai-backed client
//! - [`tools`]: weather and attraction tools plus their registry
//! - [`pipeline`]: the tool-calling agent, orchestrator and traces
//! - [`cli`]: argument parsing and output formatting

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod tools;
pub mod util;

pub use config::{ConfigError, TravelConfig};
pub use llm::{BackendError, LLMClient};
pub use pipeline::{AgentError, AgentTrace, TravelOrchestrator, TravelReport};
pub use tools::{Tool, ToolError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_tripbrief() {
        assert_eq!(NAME, "tripbrief");
    }
}
