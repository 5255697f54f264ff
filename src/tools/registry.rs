//! Tool registry
//!
//! Holds the tools exposed to the agent and describes them to the LLM.

use std::sync::Arc;

use super::attractions::AttractionsTool;
use super::error::ToolError;
use super::trait_def::Tool;
use super::weather::WeatherTool;
use crate::config::TravelConfig;
use crate::llm::ToolDefinition;

/// Registry of available tools, in registration order
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Weather and attraction tools wired to the configured providers
    pub fn from_config(config: &TravelConfig) -> Result<Self, ToolError> {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(WeatherTool::from_config(config)?),
            Arc::new(AttractionsTool::from_config(config)?),
        ];

        Ok(Self::new(tools))
    }

    /// Get all tools as ToolDefinition for LLMClient trait
    pub fn as_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.schema(),
            })
            .collect()
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Get all registered tool names
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
