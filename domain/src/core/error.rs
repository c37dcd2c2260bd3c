//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Assistant not found: {0}")]
    AssistantNotFound(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Assistant name cannot be empty")]
    EmptyAssistantName,
}

impl DomainError {
    /// Check if this error is a lookup miss (assistant or model)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::AssistantNotFound(_) | DomainError::ModelNotFound(_)
        )
    }
}
