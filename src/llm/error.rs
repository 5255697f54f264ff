//! LLM backend errors
//!
//! This module defines BackendError, returned by every `LLMClient` implementation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur while talking to an LLM backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackendError {
    /// API request failed with the given message
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Configuration error (missing API keys, invalid settings, etc.)
    ConfigurationError { message: String },

    /// Generic error for other cases
    Other { message: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            BackendError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_with_status() {
        let err = BackendError::ApiError {
            message: "quota exhausted".to_string(),
            status_code: Some(429),
        };
        assert_eq!(err.to_string(), "API error (429): quota exhausted");
    }

    #[test]
    fn test_api_error_display_without_status() {
        let err = BackendError::ApiError {
            message: "connection reset".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "API error: connection reset");
    }

    #[test]
    fn test_configuration_error_display() {
        let err = BackendError::ConfigurationError {
            message: "GEMINI_API_KEY is not set".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: GEMINI_API_KEY is not set");
    }

    #[test]
    fn test_timeout_display() {
        let err = BackendError::TimeoutError { seconds: 30 };
        assert!(err.to_string().contains("30 seconds"));
    }
}
