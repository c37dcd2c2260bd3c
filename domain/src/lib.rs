//! Domain layer for customai-studio
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! A [`ConversationSession`] is the append-only message log of the active
//! chat. The hosted API is stateless, so the whole log is replayed with every
//! request; each turn carries the system prompt that was active when it was
//! sent.
//!
//! ## Assistants
//!
//! An [`Assistant`] is a named system prompt. Every session starts with the
//! built-in "Default" assistant plus any presets found on disk.
//!
//! ## Models
//!
//! [`Model`] is the closed catalog of hosted models; [`TokenBudget`] bounds
//! how long a single response may be for the selected model.

pub mod assistant;
pub mod core;
pub mod session;

// Re-export commonly used types
pub use assistant::{
    preset::preset_name_from_filename,
    registry::{
        Assistant, AssistantRegistry, DEFAULT_ASSISTANT_NAME, DEFAULT_ASSISTANT_PROMPT,
        DeleteOutcome,
    },
};
pub use core::{
    error::DomainError,
    model::{Model, ModelCatalog, TokenBudget},
    prompt::UserPrompt,
    string::{title_case, truncate},
};
pub use session::{
    entities::{ConversationSession, Message, Role},
    state::ChatState,
};
