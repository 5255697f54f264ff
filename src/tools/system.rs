use serde_json::Value;
use tracing::{debug, info, warn};

use super::cache::ToolCache;
use super::error::ToolError;
use super::registry::ToolRegistry;
use crate::llm::ToolDefinition;

/// Result of one dispatched tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub output: Value,
    /// Served from the run's cache instead of hitting the provider
    pub cached: bool,
}

/// Dispatches tool calls for a single agent run
pub struct ToolSystem {
    registry: ToolRegistry,
    cache: ToolCache,
}

impl ToolSystem {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            cache: ToolCache::default(),
        }
    }

    /// Execute a tool and return its structured JSON result
    pub async fn execute(&self, tool_name: &str, arguments: Value) -> Result<ToolOutcome, ToolError> {
        info!(tool = tool_name, args = %arguments, "Executing tool");

        if let Some(cached) = self.cache.get(tool_name, &arguments) {
            debug!(tool = tool_name, "Tool result found in cache");
            return Ok(ToolOutcome {
                output: cached,
                cached: true,
            });
        }

        let tool = self
            .registry
            .get_tool(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        let result = tool.execute(arguments.clone()).await;

        match &result {
            Ok(output) => {
                let output_preview = serde_json::to_string(output).unwrap_or_default();
                let preview: String = output_preview.chars().take(200).collect();
                info!(tool = tool_name, "Tool execution completed");
                debug!(tool = tool_name, output_preview = %preview, "Tool output preview");

                self.cache.insert(tool_name, &arguments, output.clone());
            }
            Err(e) => {
                warn!(tool = tool_name, error = %e, "Tool execution failed");
            }
        }

        result.map(|output| ToolOutcome {
            output,
            cached: false,
        })
    }

    pub fn as_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry.as_tool_definitions()
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.registry.tool_names()
    }
}
