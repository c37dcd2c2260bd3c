//! Groq LLM Gateway implementation

use crate::groq::session::GroqSession;
use async_trait::async_trait;
use std::time::Duration;
use studio_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use studio_application::ports::secret_store::ApiKey;
use tracing::info;

/// Default endpoint of the OpenAI-compatible Groq API
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Connection settings for [`GroqLlmGateway`]
#[derive(Debug, Clone)]
pub struct GroqSettings {
    pub base_url: String,
    /// Longest wait for the next chunk of a streaming response
    pub read_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for GroqSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            read_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// LLM Gateway implementation for the Groq chat completions API
pub struct GroqLlmGateway {
    client: reqwest::Client,
    settings: GroqSettings,
}

impl GroqLlmGateway {
    /// Create a new gateway with its own HTTP client
    pub fn new(settings: GroqSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        info!("GroqLlmGateway initialized for {}", settings.base_url);

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &GroqSettings {
        &self.settings
    }
}

#[async_trait]
impl LlmGateway for GroqLlmGateway {
    async fn create_session(&self, api_key: &ApiKey) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GroqSession::new(
            self.client.clone(),
            &self.settings.base_url,
            api_key.clone(),
            self.settings.read_timeout,
        )))
    }
}
