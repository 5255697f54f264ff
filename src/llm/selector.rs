use crate::config::TravelConfig;
use crate::llm::{BackendError, GenAIClient, LLMClient};
use genai::adapter::AdapterKind;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct SelectedClient {
    pub client: Arc<dyn LLMClient>,
    pub provider: AdapterKind,
    pub description: String,
}

/// Builds the LLM client named by the configuration
///
/// The configuration is expected to be validated already; a missing key for a
/// provider that needs one is still reported here rather than at request time.
pub fn select_llm_client(config: &TravelConfig) -> Result<SelectedClient, BackendError> {
    let provider = config.provider;

    if TravelConfig::provider_key_var(provider).is_some() && config.llm_api_key.is_none() {
        return Err(BackendError::ConfigurationError {
            message: format!("No API key configured for {}", provider.as_str()),
        });
    }

    let client = GenAIClient::new(
        provider,
        config.model.clone(),
        config.llm_api_key.as_ref().map(|key| key.expose().to_string()),
        config.llm_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    info!("Using provider: {} ({})", provider.as_str(), config.model);

    Ok(SelectedClient {
        client: Arc::new(client),
        provider,
        description: format!("{} ({})", provider.as_str(), config.model),
    })
}
