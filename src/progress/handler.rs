//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while the agent works on a destination
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Agent run started
    Started { input: String },

    /// LLM request started
    LlmRequestStarted { iteration: usize },

    /// LLM response received
    LlmResponseReceived {
        iteration: usize,
        tool_calls: usize,
        response_time: Duration,
    },

    /// Tool execution started
    ToolExecutionStarted { tool_name: String, iteration: usize },

    /// Tool execution completed
    ToolExecutionComplete {
        tool_name: String,
        iteration: usize,
        execution_time: Duration,
        success: bool,
        cached: bool,
    },

    /// Model answered before calling every required tool
    ReminderSent { missing_tools: Vec<String> },

    /// Agent produced its final answer
    Completed {
        total_iterations: usize,
        tool_calls: usize,
        total_time: Duration,
    },

    /// Agent run failed
    Failed { error: String },
}

/// Receives events from the agent loop, in order, on the executor's task
///
/// Handlers must not block: the next LLM request waits for `on_progress` to
/// return.
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// For library callers and tests that only want the briefing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
