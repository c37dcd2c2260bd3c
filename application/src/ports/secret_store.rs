//! Secret store port
//!
//! The API key is looked up in the session first and here second.

/// A bearer credential for the completion API.
///
/// `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, ignoring empty or whitespace-only input
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Long-lived credential source (environment, config file, keychain)
pub trait SecretStore: Send + Sync {
    fn api_key(&self) -> Option<ApiKey>;
}

/// Store with no secrets
pub struct NoSecrets;

impl SecretStore for NoSecrets {
    fn api_key(&self) -> Option<ApiKey> {
        None
    }
}
