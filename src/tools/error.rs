use thiserror::Error;

/// Errors returned by tool execution
#[derive(Debug, Error)]
pub enum ToolError {
    /// The provider could not resolve the destination
    #[error("No matching location found for '{location}'")]
    NotFound { location: String },

    /// Transport failure, non-success status or a body we could not understand
    #[error("{provider} request failed{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    Provider {
        provider: String,
        status_code: Option<u16>,
        message: String,
    },

    /// The model sent arguments that do not match the tool schema
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    /// No tool is registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            status_code: None,
            message: message.into(),
        }
    }

    pub fn provider_status(
        provider: impl Into<String>,
        status_code: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status_code: Some(status_code),
            message: message.into(),
        }
    }
}
