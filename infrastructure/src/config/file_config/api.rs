//! API connection configuration from TOML (`[api]` section)

use crate::groq::gateway::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

/// Raw API configuration from TOML
///
/// # Example
///
/// ```toml
/// [api]
/// base_url = "https://api.groq.com/openai/v1"
/// api_key = "gsk_..."            # GROQ_API_KEY takes precedence
/// timeout_seconds = 60           # longest wait for the next streamed chunk
/// connect_timeout_seconds = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_seconds: 60,
            connect_timeout_seconds: 10,
        }
    }
}
