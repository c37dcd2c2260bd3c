//! Prompt library port
//!
//! Source of assistant presets and of the prompt-generation system prompt.

use studio_domain::Assistant;
use thiserror::Error;

/// Errors from reading prompt resources
#[derive(Error, Debug)]
pub enum PromptLibraryError {
    #[error("Prompt resource not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

/// Read-only access to prompt text resources
pub trait PromptLibrary: Send + Sync {
    /// Assistant presets, one per prompt file, in a stable order.
    fn load_presets(&self) -> Result<Vec<Assistant>, PromptLibraryError>;

    /// The fixed system prompt used to auto-generate assistant prompts.
    fn generation_prompt(&self) -> Result<String, PromptLibraryError>;
}
