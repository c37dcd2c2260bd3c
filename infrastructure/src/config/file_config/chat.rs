//! Chat defaults from TOML (`[chat]` section)

use serde::{Deserialize, Serialize};
use studio_domain::{DomainError, Model, ModelCatalog};

/// Raw chat configuration from TOML
///
/// # Example
///
/// ```toml
/// [chat]
/// model = "mixtral-8x7b-32768"
/// max_tokens = 3968          # multiple of 248, up to the model's limit
/// assistant = "Code Reviewer"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Model id; the catalog default when absent
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    /// Assistant selected at startup
    pub assistant: Option<String>,
}

impl FileChatConfig {
    /// Resolve the configured model against the catalog.
    pub fn parse_model(&self) -> Result<Model, DomainError> {
        match self.model.as_deref().map(str::trim) {
            None | Some("") => Ok(Model::default()),
            Some(id) => ModelCatalog::get(id),
        }
    }
}
