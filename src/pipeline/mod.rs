pub mod agent;
pub mod config;
pub mod orchestrator;
pub mod prompt;
pub mod trace;

pub use agent::{AgentError, AgentExecutor, AgentRun};
pub use config::AgentConfig;
pub use orchestrator::{TravelOrchestrator, TravelReport};
pub use prompt::PromptTemplate;
pub use trace::{read_trace, trace_file_name, write_trace, AgentTrace, ToolInvocation, TraceError};
