//! Infrastructure layer for customai-studio
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Groq streaming client, the file-based
//! prompt library, the secret store and configuration file loading.

pub mod config;
pub mod groq;
pub mod prompts;
pub mod secrets;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileApiConfig, FileChatConfig, FileConfig,
    FilePromptsConfig, FileReplConfig,
};
pub use groq::{
    error::{GroqError, Result},
    gateway::{DEFAULT_BASE_URL, GroqLlmGateway, GroqSettings},
    session::GroqSession,
};
pub use prompts::DirPromptLibrary;
pub use secrets::{API_KEY_ENV, ConfigSecretStore};
