use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::llm::{BackendError, ChatMessage, LLMClient, LLMRequest, LLMResponse, ToolCall, ToolDefinition};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::tools::{ToolError, ToolRegistry, ToolSystem};

use super::config::AgentConfig;
use super::prompt::PromptTemplate;
use super::trace::{AgentTrace, ToolInvocation};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(#[from] BackendError),

    #[error("Tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("Model requested unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Max iterations exceeded: {0}")]
    MaxIterationsExceeded(usize),

    #[error("Tool call limit exceeded: {0}")]
    ToolCallLimitExceeded(usize),
}

/// Final answer plus the record of how it was produced
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub output: String,
    pub trace: AgentTrace,
}

/// Mutable state of one run
struct RunState {
    messages: Vec<ChatMessage>,
    steps: Vec<ToolInvocation>,
    called: HashSet<String>,
    reminder_sent: bool,
    iterations: usize,
}

/// Tool-calling loop: the model picks tools, the executor runs them and feeds
/// results back until the model answers in text
pub struct AgentExecutor {
    llm_client: Arc<dyn LLMClient>,
    registry: ToolRegistry,
    prompt: PromptTemplate,
    config: AgentConfig,
    progress: Arc<dyn ProgressHandler>,
}

impl AgentExecutor {
    pub fn new(
        llm_client: Arc<dyn LLMClient>,
        registry: ToolRegistry,
        prompt: PromptTemplate,
        config: AgentConfig,
    ) -> Self {
        Self {
            llm_client,
            registry,
            prompt,
            config,
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    /// Runs the agent on one rendered user input
    ///
    /// Every registered tool is required. Tool output is cached per run, so a
    /// repeated call with identical arguments never reaches the provider twice.
    pub async fn run(&self, input: &str) -> Result<AgentRun, AgentError> {
        let started_at = Utc::now();
        let start = Instant::now();

        self.progress.on_progress(&ProgressEvent::Started {
            input: input.to_string(),
        });
        info!(
            provider = self.llm_client.name(),
            tools = self.registry.len(),
            "Starting agent run"
        );

        let tool_system = ToolSystem::new(self.registry.clone());
        let mut state = RunState {
            messages: self.prompt.initial_messages(input),
            steps: Vec::new(),
            called: HashSet::new(),
            reminder_sent: false,
            iterations: 0,
        };

        match self.agent_loop(&tool_system, &mut state).await {
            Ok(output) => {
                self.progress.on_progress(&ProgressEvent::Completed {
                    total_iterations: state.iterations,
                    tool_calls: state.steps.len(),
                    total_time: start.elapsed(),
                });
                info!(
                    iterations = state.iterations,
                    tool_calls = state.steps.len(),
                    "Agent run completed"
                );

                let trace = AgentTrace {
                    run_id: Uuid::new_v4().to_string(),
                    input: input.to_string(),
                    output: output.clone(),
                    provider: self.llm_client.name().to_string(),
                    model: self.llm_client.model_info(),
                    intermediate_steps: state.steps,
                    messages: state.messages,
                    iterations: state.iterations,
                    started_at,
                    finished_at: Utc::now(),
                };

                Ok(AgentRun { output, trace })
            }
            Err(e) => {
                error!(error = %e, iterations = state.iterations, "Agent run failed");
                self.progress.on_progress(&ProgressEvent::Failed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn agent_loop(
        &self,
        tool_system: &ToolSystem,
        state: &mut RunState,
    ) -> Result<String, AgentError> {
        let tools = tool_system.as_tool_definitions();
        let required: Vec<String> = tool_system
            .tool_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let max_iterations = self.config.max_iterations;

        loop {
            state.iterations += 1;
            let iteration = state.iterations;

            if iteration > max_iterations {
                return Err(AgentError::MaxIterationsExceeded(max_iterations));
            }

            debug!("Iteration {}/{}", iteration, max_iterations);
            self.progress
                .on_progress(&ProgressEvent::LlmRequestStarted { iteration });

            let response = self.execute_llm_request(&state.messages, &tools).await?;

            self.progress.on_progress(&ProgressEvent::LlmResponseReceived {
                iteration,
                tool_calls: response.tool_calls.len(),
                response_time: response.response_time,
            });

            if response.has_tool_calls() {
                state.messages.push(ChatMessage::assistant_with_tools(
                    &response.content,
                    response.tool_calls.clone(),
                ));
                self.process_tool_calls(&response.tool_calls, tool_system, state, iteration)
                    .await?;
                continue;
            }

            let answer = response.content.trim();
            if !answer.is_empty() {
                state.messages.push(ChatMessage::assistant(&response.content));
            }

            let missing: Vec<String> = required
                .iter()
                .filter(|name| !state.called.contains(*name))
                .cloned()
                .collect();

            if !missing.is_empty() {
                if !state.reminder_sent {
                    state.reminder_sent = true;
                    self.progress.on_progress(&ProgressEvent::ReminderSent {
                        missing_tools: missing.clone(),
                    });
                    state
                        .messages
                        .push(ChatMessage::user(PromptTemplate::reminder(&missing)));
                    continue;
                }

                warn!(
                    missing = %missing.join(", "),
                    "Accepting answer although not every tool was called"
                );
            }

            if answer.is_empty() {
                return Err(AgentError::InvalidResponse(
                    "model returned an empty answer".to_string(),
                ));
            }

            return Ok(answer.to_string());
        }
    }

    async fn execute_llm_request(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse, AgentError> {
        let mut request = LLMRequest::new(messages.to_vec()).with_tools(tools.to_vec());
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        Ok(self.llm_client.chat(request).await?)
    }

    /// Runs calls in the order the model listed them; the first failure ends the run
    async fn process_tool_calls(
        &self,
        tool_calls: &[ToolCall],
        tool_system: &ToolSystem,
        state: &mut RunState,
        iteration: usize,
    ) -> Result<(), AgentError> {
        for tool_call in tool_calls {
            if state.steps.len() >= self.config.max_tool_calls {
                return Err(AgentError::ToolCallLimitExceeded(self.config.max_tool_calls));
            }

            debug!(
                "Executing tool: {} with call_id: {}",
                tool_call.name, tool_call.call_id
            );

            let start_time = Instant::now();
            self.progress.on_progress(&ProgressEvent::ToolExecutionStarted {
                tool_name: tool_call.name.clone(),
                iteration,
            });

            let result = tool_system
                .execute(&tool_call.name, tool_call.arguments.clone())
                .await;
            let execution_time = start_time.elapsed();

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.progress
                        .on_progress(&ProgressEvent::ToolExecutionComplete {
                            tool_name: tool_call.name.clone(),
                            iteration,
                            execution_time,
                            success: false,
                            cached: false,
                        });
                    return Err(match e {
                        ToolError::UnknownTool(name) => AgentError::UnknownTool(name),
                        source => AgentError::Tool {
                            tool: tool_call.name.clone(),
                            source,
                        },
                    });
                }
            };

            self.progress
                .on_progress(&ProgressEvent::ToolExecutionComplete {
                    tool_name: tool_call.name.clone(),
                    iteration,
                    execution_time,
                    success: true,
                    cached: outcome.cached,
                });

            state.messages.push(ChatMessage::tool_response(
                &tool_call.call_id,
                outcome.output.to_string(),
            ));
            state.called.insert(tool_call.name.clone());
            state.steps.push(ToolInvocation {
                call_id: tool_call.call_id.clone(),
                tool: tool_call.name.clone(),
                arguments: tool_call.arguments.clone(),
                output: outcome.output,
                cached: outcome.cached,
                duration_ms: execution_time.as_millis() as u64,
            });
        }

        Ok(())
    }
}
