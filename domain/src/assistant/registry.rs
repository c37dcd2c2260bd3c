//! Assistant entity and the per-session registry

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Name of the built-in assistant every registry starts with
pub const DEFAULT_ASSISTANT_NAME: &str = "Default";

/// System prompt of the built-in assistant
pub const DEFAULT_ASSISTANT_PROMPT: &str = "Hello! I'm your helpful assistant, ready to assist you \
with any questions or tasks you have. Whether you need information, advice, or just someone to \
chat with, I'm here to help. Just let me know how I can assist you today!";

/// A named system prompt (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assistant {
    pub name: String,
    pub system_prompt: String,
}

impl Assistant {
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// The built-in "Default" assistant
    pub fn builtin() -> Self {
        Self::new(DEFAULT_ASSISTANT_NAME, DEFAULT_ASSISTANT_PROMPT)
    }
}

/// Result of [`AssistantRegistry::delete`].
///
/// A miss is an ordinary outcome reported to the user, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    NotFound,
}

/// Mapping from assistant name to system prompt, in insertion order.
///
/// Names are unique; adding an existing name overwrites its prompt in place.
#[derive(Debug, Clone, Default)]
pub struct AssistantRegistry {
    assistants: Vec<Assistant>,
}

impl AssistantRegistry {
    /// An empty registry (no built-in entry)
    pub fn new() -> Self {
        Self::default()
    }

    /// "Default" first, then each preset in the given order.
    ///
    /// A preset named "Default" replaces the built-in prompt.
    pub fn seeded(presets: impl IntoIterator<Item = Assistant>) -> Self {
        let mut registry = Self::new();
        registry.add(Assistant::builtin());
        for preset in presets {
            registry.add(preset);
        }
        registry
    }

    /// Insert or overwrite. Returns `true` when an existing entry was replaced.
    pub fn add(&mut self, assistant: Assistant) -> bool {
        match self.assistants.iter_mut().find(|a| a.name == assistant.name) {
            Some(existing) => {
                existing.system_prompt = assistant.system_prompt;
                true
            }
            None => {
                self.assistants.push(assistant);
                false
            }
        }
    }

    /// Get the system prompt for `name`.
    pub fn get(&self, name: &str) -> Result<&str, DomainError> {
        self.assistants
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.system_prompt.as_str())
            .ok_or_else(|| DomainError::AssistantNotFound(name.to_string()))
    }

    pub fn delete(&mut self, name: &str) -> DeleteOutcome {
        match self.assistants.iter().position(|a| a.name == name) {
            Some(index) => {
                self.assistants.remove(index);
                DeleteOutcome::Removed
            }
            None => DeleteOutcome::NotFound,
        }
    }

    /// Assistant names in insertion order.
    pub fn list(&self) -> Vec<&str> {
        self.assistants.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assistants.iter().any(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assistant> {
        self.assistants.iter()
    }

    pub fn len(&self) -> usize {
        self.assistants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assistants.is_empty()
    }
}
