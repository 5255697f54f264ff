//! Configuration management for tripbrief
//!
//! This module loads settings from environment variables (optionally sourced
//! from a local `.env` file) with sensible defaults. Configuration covers the
//! LLM provider, the two provider credentials, endpoints, agent limits and
//! output options.
//!
//! # Environment Variables
//!
//! ## Credentials
//! - `WEATHER_API_KEY`: WeatherAPI.com key - **required**
//! - LLM key named after the provider, e.g. `GEMINI_API_KEY`, `OPENAI_API_KEY`,
//!   `ANTHROPIC_API_KEY` - **required** unless the provider is keyless (Ollama)
//!
//! ## tripbrief Configuration
//! - `TRIPBRIEF_PROVIDER`: gemini|openai|anthropic|ollama|groq|xai - default: "gemini"
//! - `TRIPBRIEF_MODEL`: Model name - default depends on provider
//! - `TRIPBRIEF_LLM_BASE_URL`: Custom LLM endpoint - optional
//! - `TRIPBRIEF_WEATHER_BASE_URL`: default: "https://api.weatherapi.com/v1"
//! - `TRIPBRIEF_SEARCH_BASE_URL`: default: "https://html.duckduckgo.com"
//! - `TRIPBRIEF_FORECAST_DAYS`: default: "7"
//! - `TRIPBRIEF_MAX_RESULTS`: Attraction search results - default: "8"
//! - `TRIPBRIEF_REQUEST_TIMEOUT`: Timeout in seconds - default: "30"
//! - `TRIPBRIEF_MAX_ITERATIONS`: LLM turns per run - default: "6"
//! - `TRIPBRIEF_MAX_TOOL_CALLS`: Tool calls per run - default: "8"
//! - `TRIPBRIEF_OUTPUT_DIR`: Where trace files are written - default: "."
//! - `TRIPBRIEF_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use tripbrief::TravelConfig;
//!
//! let config = TravelConfig::from_env();
//! config.validate().expect("Invalid configuration");
//! ```

use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_PROVIDER: AdapterKind = AdapterKind::Gemini;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:7b";
const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_XAI_MODEL: &str = "grok-3-mini";
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.weatherapi.com/v1";
const DEFAULT_SEARCH_BASE_URL: &str = "https://html.duckduckgo.com";
const DEFAULT_FORECAST_DAYS: u8 = 7;
const DEFAULT_MAX_RESULTS: usize = 8;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_ITERATIONS: usize = 6;
const DEFAULT_MAX_TOOL_CALLS: usize = 8;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding the weather provider key
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential is not set
    #[error("Missing credential: set the {0} environment variable")]
    MissingCredential(String),

    /// Invalid provider name
    #[error("Invalid provider: {0}. Valid options: gemini, openai, anthropic, ollama, groq, xai")]
    InvalidProvider(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// An API credential that never shows up in logs or debug output
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key for use in an outbound request
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Main configuration structure for tripbrief
///
/// `Default::default()` loads from environment variables with fallback
/// defaults. Components receive this struct (or pieces of it) at
/// construction time and never read the environment themselves.
#[derive(Debug, Clone)]
pub struct TravelConfig {
    /// LLM provider (from genai)
    pub provider: AdapterKind,

    /// `TRIPBRIEF_PROVIDER` value that names no known provider; `validate()`
    /// reports it until a provider is chosen explicitly
    pub unrecognized_provider: Option<String>,

    /// Model name to use for inference (provider-specific)
    pub model: String,

    /// Key for the LLM provider, if it needs one
    pub llm_api_key: Option<ApiKey>,

    /// Custom LLM endpoint
    pub llm_base_url: Option<String>,

    /// WeatherAPI.com key
    pub weather_api_key: Option<ApiKey>,

    /// Weather provider base URL
    pub weather_base_url: String,

    /// Search provider base URL
    pub search_base_url: String,

    /// Number of forecast days requested from the weather provider
    pub forecast_days: u8,

    /// Maximum attraction search results handed to the model
    pub max_results: usize,

    /// Request timeout in seconds, shared by the LLM and HTTP tools
    pub request_timeout_secs: u64,

    /// Maximum LLM turns per agent run
    pub max_iterations: usize,

    /// Maximum tool calls per agent run
    pub max_tool_calls: usize,

    /// Directory receiving trace files
    pub output_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for TravelConfig {
    /// Creates a new configuration by loading from environment variables with defaults
    fn default() -> Self {
        let raw_provider = env::var("TRIPBRIEF_PROVIDER")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let (provider, unrecognized_provider) = match raw_provider {
            Some(raw) => match parse_provider(&raw) {
                Ok(kind) => (kind, None),
                Err(_) => (DEFAULT_PROVIDER, Some(raw)),
            },
            None => (DEFAULT_PROVIDER, None),
        };

        let mut config = Self::for_provider(provider);
        config.unrecognized_provider = unrecognized_provider;

        if let Ok(model) = env::var("TRIPBRIEF_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }

        config.llm_api_key = Self::provider_key_from_env(provider);
        config.llm_base_url = env::var("TRIPBRIEF_LLM_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        config.weather_api_key = non_empty_env(WEATHER_API_KEY_VAR).map(ApiKey::new);

        if let Ok(url) = env::var("TRIPBRIEF_WEATHER_BASE_URL") {
            config.weather_base_url = url;
        }
        if let Ok(url) = env::var("TRIPBRIEF_SEARCH_BASE_URL") {
            config.search_base_url = url;
        }

        config.forecast_days = env::var("TRIPBRIEF_FORECAST_DAYS")
            .ok()
            .and_then(|v| v.parse::<u8>().ok())
            .unwrap_or(DEFAULT_FORECAST_DAYS);

        config.max_results = env::var("TRIPBRIEF_MAX_RESULTS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_RESULTS);

        config.request_timeout_secs = env::var("TRIPBRIEF_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        config.max_iterations = env::var("TRIPBRIEF_MAX_ITERATIONS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_ITERATIONS);

        config.max_tool_calls = env::var("TRIPBRIEF_MAX_TOOL_CALLS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_TOOL_CALLS);

        if let Ok(dir) = env::var("TRIPBRIEF_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        config.log_level = env::var("TRIPBRIEF_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        config
    }
}

impl TravelConfig {
    /// Loads `.env` (if present) and then reads the environment
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::default()
    }

    /// Built-in defaults for a provider, without consulting the environment
    pub fn for_provider(provider: AdapterKind) -> Self {
        Self {
            provider,
            unrecognized_provider: None,
            model: Self::default_model(provider).to_string(),
            llm_api_key: None,
            llm_base_url: None,
            weather_api_key: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            max_results: DEFAULT_MAX_RESULTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_tool_calls: DEFAULT_MAX_TOOL_CALLS,
            output_dir: PathBuf::from("."),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Default model for a provider
    pub fn default_model(provider: AdapterKind) -> &'static str {
        match provider {
            AdapterKind::OpenAI => DEFAULT_OPENAI_MODEL,
            AdapterKind::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            AdapterKind::Ollama => DEFAULT_OLLAMA_MODEL,
            AdapterKind::Groq => DEFAULT_GROQ_MODEL,
            AdapterKind::Xai => DEFAULT_XAI_MODEL,
            _ => DEFAULT_GEMINI_MODEL,
        }
    }

    /// Environment variable carrying the key for a provider, `None` if keyless
    pub fn provider_key_var(provider: AdapterKind) -> Option<&'static str> {
        provider.default_key_env_name()
    }

    fn provider_key_from_env(provider: AdapterKind) -> Option<ApiKey> {
        Self::provider_key_var(provider)
            .and_then(non_empty_env)
            .map(ApiKey::new)
    }

    /// Switches provider, re-resolving its key and default model
    ///
    /// An explicitly chosen model survives the switch only if `keep_model` is set.
    pub fn with_provider(mut self, provider: AdapterKind, keep_model: bool) -> Self {
        if self.provider != provider {
            self.llm_api_key = Self::provider_key_from_env(provider);
            if !keep_model {
                self.model = Self::default_model(provider).to_string();
            }
        }
        self.provider = provider;
        self.unrecognized_provider = None;
        self
    }

    /// Validates the configuration
    ///
    /// Checks that:
    /// - `TRIPBRIEF_PROVIDER`, if set, named a known provider
    /// - Both credentials are present (the LLM key only for providers that need one)
    /// - Numeric values are in valid ranges
    /// - Endpoints are HTTP(S) URLs
    /// - Log level is valid
    ///
    /// Runs before any client is built, so a failure here means no network
    /// call was attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(raw) = &self.unrecognized_provider {
            return Err(ConfigError::InvalidProvider(raw.clone()));
        }
        self.validate_credentials()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validates that required credentials are present
    pub fn validate_credentials(&self) -> Result<(), ConfigError> {
        if let Some(var) = Self::provider_key_var(self.provider) {
            match &self.llm_api_key {
                Some(key) if !key.is_blank() => {}
                _ => return Err(ConfigError::MissingCredential(var.to_string())),
            }
        }

        match &self.weather_api_key {
            Some(key) if !key.is_blank() => Ok(()),
            _ => Err(ConfigError::MissingCredential(
                WEATHER_API_KEY_VAR.to_string(),
            )),
        }
    }

    fn validate_numeric_ranges(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if !(1..=10).contains(&self.forecast_days) {
            return Err(ConfigError::ValidationFailed(
                "Forecast days must be between 1 and 10".to_string(),
            ));
        }

        if !(1..=25).contains(&self.max_results) {
            return Err(ConfigError::ValidationFailed(
                "Max results must be between 1 and 25".to_string(),
            ));
        }

        if !(1..=20).contains(&self.max_iterations) {
            return Err(ConfigError::ValidationFailed(
                "Max iterations must be between 1 and 20".to_string(),
            ));
        }

        if !(1..=20).contains(&self.max_tool_calls) {
            return Err(ConfigError::ValidationFailed(
                "Max tool calls must be between 1 and 20".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name cannot be empty".to_string(),
            ));
        }

        for (field, url) in [
            ("weather_base_url", Some(&self.weather_base_url)),
            ("search_base_url", Some(&self.search_base_url)),
            ("llm_base_url", self.llm_base_url.as_ref()),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::ParseError {
                        field: field.to_string(),
                        error: format!("'{}' is not an HTTP or HTTPS URL", url),
                    });
                }
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            ))),
        }
    }
}

impl fmt::Display for TravelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |key: &Option<ApiKey>| if key.is_some() { "set" } else { "missing" };

        writeln!(f, "tripbrief Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  LLM Key: {}", mask(&self.llm_api_key))?;
        writeln!(f, "  Weather Key: {}", mask(&self.weather_api_key))?;
        writeln!(f, "  Weather API: {}", self.weather_base_url)?;
        writeln!(f, "  Search API: {}", self.search_base_url)?;
        writeln!(f, "  Forecast Days: {}", self.forecast_days)?;
        writeln!(f, "  Max Results: {}", self.max_results)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Max Iterations: {}", self.max_iterations)?;
        writeln!(f, "  Max Tool Calls: {}", self.max_tool_calls)?;
        writeln!(f, "  Output Dir: {}", self.output_dir.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

/// Parses a provider name as accepted on the command line and in `TRIPBRIEF_PROVIDER`
pub fn parse_provider(s: &str) -> Result<AdapterKind, ConfigError> {
    let lower = s.trim().to_lowercase();
    let normalized = match lower.as_str() {
        "claude" => "anthropic",
        "grok" => "xai",
        other => other,
    };
    AdapterKind::from_lower_str(normalized).ok_or_else(|| ConfigError::InvalidProvider(s.to_string()))
}

fn non_empty_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}
