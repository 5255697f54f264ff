//! Recorded agent runs and their on-disk form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::llm::ChatMessage;

/// One tool call dispatched during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub call_id: String,
    pub tool: String,
    pub arguments: Value,
    pub output: Value,
    #[serde(default)]
    pub cached: bool,
    pub duration_ms: u64,
}

/// Full record of one agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTrace {
    pub run_id: String,
    pub input: String,
    pub output: String,
    pub provider: String,
    pub model: Option<String>,
    pub intermediate_steps: Vec<ToolInvocation>,
    pub messages: Vec<ChatMessage>,
    pub iterations: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AgentTrace {
    /// Number of invocations of `tool`, cached ones included
    pub fn calls_to(&self, tool: &str) -> usize {
        self.intermediate_steps
            .iter()
            .filter(|step| step.tool == tool)
            .count()
    }
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to write trace to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize trace: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// `travel_assistant_output_{destination}.json`, with characters that are
/// awkward in file names replaced by `_`
pub fn trace_file_name(destination: &str) -> String {
    let sanitized: String = destination
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    format!("travel_assistant_output_{}.json", sanitized)
}

/// Writes the trace as pretty JSON, replacing any previous file for the destination
pub fn write_trace(
    output_dir: &Path,
    destination: &str,
    trace: &AgentTrace,
) -> Result<PathBuf, TraceError> {
    let path = output_dir.join(trace_file_name(destination));
    let json = serde_json::to_string_pretty(trace)?;

    if !output_dir.as_os_str().is_empty() {
        fs::create_dir_all(output_dir).map_err(|source| TraceError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
    }

    fs::write(&path, json).map_err(|source| TraceError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "Trace written");
    Ok(path)
}

pub fn read_trace(path: &Path) -> Result<AgentTrace, TraceError> {
    let content = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
