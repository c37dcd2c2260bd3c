//! Assistant management use cases.
//!
//! Seeding the registry once per session, selecting, deleting and creating
//! assistants. Lookup misses are reported as outcomes, not failures, so the
//! caller can show a notice and carry on.

use crate::ports::prompt_library::PromptLibrary;
use crate::session::SessionContext;
use std::sync::Arc;
use studio_domain::{
    Assistant, AssistantRegistry, DEFAULT_ASSISTANT_NAME, DeleteOutcome, DomainError,
};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from creating an assistant
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssistantError {
    #[error("Please enter a valid assistant name.")]
    EmptyName,

    #[error("Assistant prompt cannot be empty")]
    EmptyPrompt,

    #[error("No generated prompt yet. Generate one first.")]
    NoGeneratedPrompt,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Where a new assistant's system prompt comes from
#[derive(Debug, Clone)]
pub enum PromptSource {
    /// Text typed by the user
    Custom(String),
    /// The last prompt produced by the prompt generator in this session
    Generated,
}

/// What [`AssistantService::delete`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub name: String,
    pub outcome: DeleteOutcome,
    /// New selection when the deleted assistant was the selected one.
    pub reselected: Option<String>,
}

/// What [`AssistantService::create`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReport {
    pub name: String,
    pub prompt: String,
    /// `true` when an assistant with the same name was overwritten.
    pub replaced: bool,
}

/// Use cases over the session's [`AssistantRegistry`].
#[derive(Clone)]
pub struct AssistantService {
    library: Arc<dyn PromptLibrary>,
}

impl AssistantService {
    pub fn new(library: Arc<dyn PromptLibrary>) -> Self {
        Self { library }
    }

    /// Seed the registry on first use; later calls leave it untouched.
    ///
    /// Seeds "Default" plus every preset the library provides, and selects
    /// "Default" when nothing is selected yet. A library failure is logged
    /// and leaves only the built-in assistant.
    pub fn ensure_initialized<'a>(&self, ctx: &'a mut SessionContext) -> &'a AssistantRegistry {
        if ctx.assistants().is_none() {
            let presets = self.library.load_presets().unwrap_or_else(|e| {
                warn!("Could not load assistant presets: {}", e);
                Vec::new()
            });
            info!("Seeding assistants with {} presets", presets.len());
            ctx.install_assistants(AssistantRegistry::seeded(presets));

            if ctx.selected_assistant().is_none() {
                let _ = ctx.select_assistant(DEFAULT_ASSISTANT_NAME);
            }
        }
        ctx.assistants_or_builtin()
    }

    /// Select an assistant by name.
    pub fn select(&self, ctx: &mut SessionContext, name: &str) -> Result<(), DomainError> {
        self.ensure_initialized(ctx);
        ctx.select_assistant(name)
    }

    /// Delete an assistant.
    ///
    /// When the deleted assistant was selected, "Default" is re-selected if
    /// it still exists; otherwise the selection is cleared and the next chat
    /// turn fails until the user picks one.
    pub fn delete(&self, ctx: &mut SessionContext, name: &str) -> DeleteReport {
        self.ensure_initialized(ctx);
        let outcome = ctx
            .assistants_mut()
            .map_or(DeleteOutcome::NotFound, |r| r.delete(name));

        let mut reselected = None;
        if outcome == DeleteOutcome::Removed && ctx.selected_assistant() == Some(name) {
            if ctx.select_assistant(DEFAULT_ASSISTANT_NAME).is_ok() {
                reselected = Some(DEFAULT_ASSISTANT_NAME.to_string());
            } else {
                ctx.clear_selection();
            }
        }

        match outcome {
            DeleteOutcome::Removed => info!(assistant = name, "Assistant deleted"),
            DeleteOutcome::NotFound => warn!(assistant = name, "Delete requested for unknown assistant"),
        }

        DeleteReport {
            name: name.to_string(),
            outcome,
            reselected,
        }
    }

    /// Create (or overwrite) an assistant.
    pub fn create(
        &self,
        ctx: &mut SessionContext,
        name: &str,
        source: PromptSource,
    ) -> Result<CreateReport, AssistantError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AssistantError::EmptyName);
        }

        let prompt = match source {
            PromptSource::Custom(text) => text,
            PromptSource::Generated => ctx
                .generated_prompt()
                .map(str::to_string)
                .ok_or(AssistantError::NoGeneratedPrompt)?,
        };
        if prompt.trim().is_empty() {
            return Err(AssistantError::EmptyPrompt);
        }

        self.ensure_initialized(ctx);
        let replaced = ctx
            .assistants_mut()
            .map(|r| r.add(Assistant::new(name, prompt.clone())))
            .unwrap_or(false);

        info!(assistant = name, replaced, "Assistant created");
        Ok(CreateReport {
            name: name.to_string(),
            prompt,
            replaced,
        })
    }
}
