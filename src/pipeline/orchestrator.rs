use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::agent::{AgentError, AgentExecutor};
use super::config::AgentConfig;
use super::prompt::PromptTemplate;
use super::trace::AgentTrace;
use crate::config::TravelConfig;
use crate::llm::LLMClient;
use crate::progress::ProgressHandler;
use crate::tools::{ToolError, ToolRegistry};

/// Travel briefing for one destination
#[derive(Debug, Clone, Serialize)]
pub struct TravelReport {
    pub destination: String,
    pub summary: String,
    pub trace: AgentTrace,
}

/// Runs the travel agent for a destination
pub struct TravelOrchestrator {
    executor: AgentExecutor,
}

impl TravelOrchestrator {
    pub fn new(executor: AgentExecutor) -> Self {
        Self { executor }
    }

    /// Wires the configured weather and search tools to `llm_client`
    pub fn from_config(
        config: &TravelConfig,
        llm_client: Arc<dyn LLMClient>,
        progress: Arc<dyn ProgressHandler>,
    ) -> Result<Self, ToolError> {
        let registry = ToolRegistry::from_config(config)?;
        let executor = AgentExecutor::new(
            llm_client,
            registry,
            PromptTemplate::default(),
            AgentConfig::from(config),
        )
        .with_progress(progress);

        Ok(Self::new(executor))
    }

    pub async fn run(&self, destination: &str) -> Result<TravelReport, AgentError> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(AgentError::InvalidInput(
                "destination must not be empty".to_string(),
            ));
        }

        info!(destination, "Preparing travel briefing");
        let input = self.executor.prompt().render_input(destination);
        let run = self.executor.run(&input).await?;

        Ok(TravelReport {
            destination: destination.to_string(),
            summary: run.output,
            trace: run.trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLLMClient, MockResponse};
    use crate::tools::Tool;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoTool(&'static str);

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "echo"
        }

        fn schema(&self) -> Value {
            json!({"type": "object"})
        }

        async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
            Ok(arguments)
        }
    }

    fn orchestrator(llm: Arc<MockLLMClient>) -> TravelOrchestrator {
        let registry = ToolRegistry::new(vec![
            Arc::new(EchoTool("get_weather")) as Arc<dyn Tool>,
            Arc::new(EchoTool("search_attractions")) as Arc<dyn Tool>,
        ]);
        TravelOrchestrator::new(AgentExecutor::new(
            llm,
            registry,
            PromptTemplate::default(),
            AgentConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_run_renders_destination_into_input() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_responses(vec![
            MockResponse::with_tool_calls(
                "",
                vec![
                    MockLLMClient::weather_call("c1", "Kyoto"),
                    MockLLMClient::attractions_call("c2", "Kyoto"),
                ],
            ),
            MockResponse::text("Mild weather. See Fushimi Inari."),
        ]);

        let report = orchestrator(llm.clone()).run("  Kyoto ").await.unwrap();

        assert_eq!(report.destination, "Kyoto");
        assert_eq!(report.summary, "Mild weather. See Fushimi Inari.");
        assert!(report.trace.input.starts_with("Destination: Kyoto."));
        assert_eq!(llm.requests()[0].messages[1].content, report.trace.input);
    }

    #[tokio::test]
    async fn test_empty_destination_rejected_before_llm() {
        let llm = Arc::new(MockLLMClient::new());

        let err = orchestrator(llm.clone()).run("   ").await.unwrap_err();

        assert!(matches!(err, AgentError::InvalidInput(_)));
        assert!(llm.requests().is_empty());
    }
}
