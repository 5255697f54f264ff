use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;

/// Chat backend the agent talks to
///
/// A request carries the running conversation plus the weather and attraction
/// tool definitions. The response either asks for tool calls or holds the
/// finished briefing. Implementations must not retry on their own; the agent
/// treats every `Err` as fatal for the run.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    /// Provider label recorded in the trace
    fn name(&self) -> &str;

    /// Model identifier, when the backend knows it
    fn model_info(&self) -> Option<String> {
        None
    }
}
