//! Secret store backed by the environment and the config file

use studio_application::ports::secret_store::{ApiKey, SecretStore};
use tracing::debug;

/// Environment variable holding the Groq API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Resolves the API key from the environment first, then from `[api] api_key`.
///
/// Values are captured once at construction.
#[derive(Clone, Default)]
pub struct ConfigSecretStore {
    env_key: Option<ApiKey>,
    config_key: Option<ApiKey>,
}

impl ConfigSecretStore {
    pub fn new(env_key: Option<String>, config_key: Option<String>) -> Self {
        Self {
            env_key: env_key.and_then(ApiKey::new),
            config_key: config_key.and_then(ApiKey::new),
        }
    }

    /// Read `GROQ_API_KEY` from the process environment.
    pub fn from_env(config_key: Option<String>) -> Self {
        Self::new(std::env::var(API_KEY_ENV).ok(), config_key)
    }
}

impl SecretStore for ConfigSecretStore {
    fn api_key(&self) -> Option<ApiKey> {
        if let Some(key) = &self.env_key {
            debug!("Using API key from {}", API_KEY_ENV);
            return Some(key.clone());
        }
        self.config_key.clone().inspect(|_| debug!("Using API key from config file"))
    }
}
