//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion to runtime types happens in
//! the `to_*` helpers on [`FileConfig`].

mod api;
mod chat;
mod prompts;
mod repl;

pub use api::FileApiConfig;
pub use chat::FileChatConfig;
pub use prompts::FilePromptsConfig;
pub use repl::FileReplConfig;

use crate::groq::gateway::GroqSettings;
use crate::prompts::DirPromptLibrary;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("api.{field} cannot be 0")]
    InvalidTimeout { field: &'static str },

    #[error("api.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("chat.model: unknown model '{0}'")]
    UnknownModel(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// API connection settings
    pub api: FileApiConfig,
    /// Chat defaults
    pub chat: FileChatConfig,
    /// Prompt resource locations
    pub prompts: FilePromptsConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout {
                field: "timeout_seconds",
            });
        }
        if self.api.connect_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout {
                field: "connect_timeout_seconds",
            });
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if self.chat.parse_model().is_err() {
            return Err(ConfigValidationError::UnknownModel(
                self.chat.model.clone().unwrap_or_default(),
            ));
        }
        Ok(())
    }

    pub fn to_groq_settings(&self) -> GroqSettings {
        GroqSettings {
            base_url: self.api.base_url.trim().to_string(),
            read_timeout: Duration::from_secs(self.api.timeout_seconds),
            connect_timeout: Duration::from_secs(self.api.connect_timeout_seconds),
        }
    }

    pub fn to_prompt_library(&self) -> DirPromptLibrary {
        DirPromptLibrary::new(&self.prompts.directory, &self.prompts.generation_prompt)
    }
}
