//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { input } => {
                info!(input = %input, "Starting travel assistant");
            }
            ProgressEvent::LlmRequestStarted { iteration } => {
                debug!(iteration, "Sending request to LLM");
            }
            ProgressEvent::LlmResponseReceived {
                iteration,
                tool_calls,
                response_time,
            } => {
                debug!(
                    iteration,
                    tool_calls,
                    response_time_ms = response_time.as_millis(),
                    "Received LLM response"
                );
            }
            ProgressEvent::ToolExecutionStarted {
                tool_name,
                iteration,
            } => {
                info!(tool = %tool_name, iteration, "Calling tool");
            }
            ProgressEvent::ToolExecutionComplete {
                tool_name,
                iteration,
                execution_time,
                success,
                cached,
            } => {
                if *success {
                    debug!(
                        tool = %tool_name,
                        iteration,
                        cached,
                        execution_time_ms = execution_time.as_millis(),
                        "Tool execution complete"
                    );
                } else {
                    warn!(
                        tool = %tool_name,
                        iteration,
                        execution_time_ms = execution_time.as_millis(),
                        "Tool execution failed"
                    );
                }
            }
            ProgressEvent::ReminderSent { missing_tools } => {
                warn!(
                    missing = %missing_tools.join(", "),
                    "Model answered early, reminding it to call the remaining tools"
                );
            }
            ProgressEvent::Completed {
                total_iterations,
                tool_calls,
                total_time,
            } => {
                info!(
                    iterations = total_iterations,
                    tool_calls,
                    total_time_ms = total_time.as_millis(),
                    "Travel summary ready"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Travel assistant failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::Started {
                input: "Destination: Paris.".to_string(),
            },
            ProgressEvent::LlmRequestStarted { iteration: 1 },
            ProgressEvent::LlmResponseReceived {
                iteration: 1,
                tool_calls: 2,
                response_time: Duration::from_millis(100),
            },
            ProgressEvent::ToolExecutionStarted {
                tool_name: "get_weather".to_string(),
                iteration: 1,
            },
            ProgressEvent::ToolExecutionComplete {
                tool_name: "get_weather".to_string(),
                iteration: 1,
                execution_time: Duration::from_millis(10),
                success: true,
                cached: false,
            },
            ProgressEvent::ToolExecutionComplete {
                tool_name: "search_attractions".to_string(),
                iteration: 1,
                execution_time: Duration::from_millis(10),
                success: false,
                cached: false,
            },
            ProgressEvent::ReminderSent {
                missing_tools: vec!["search_attractions".to_string()],
            },
            ProgressEvent::Completed {
                total_iterations: 3,
                tool_calls: 2,
                total_time: Duration::from_secs(5),
            },
            ProgressEvent::Failed {
                error: "Test error".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
