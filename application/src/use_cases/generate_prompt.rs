//! Prompt generation use case
//!
//! Turns a short description ("a sarcastic sommelier") into a full system
//! prompt by asking a fixed model with a fixed generation prompt. The result
//! is kept in the session so it can become a new assistant.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::prompt_library::{PromptLibrary, PromptLibraryError};
use crate::ports::secret_store::SecretStore;
use crate::session::SessionContext;
use std::sync::Arc;
use studio_domain::{Message, Model, TokenBudget};
use thiserror::Error;
use tracing::{debug, info};

/// Response budget for generated prompts
pub const GENERATION_MAX_TOKENS: u32 = 8192;

/// Errors from prompt generation
#[derive(Error, Debug)]
pub enum GeneratePromptError {
    #[error("Describe the assistant you want before generating a prompt")]
    EmptyInput,

    #[error("API Key is required to proceed.")]
    MissingCredential,

    #[error("Generation prompt unavailable: {0}")]
    Library(#[from] PromptLibraryError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Generates assistant system prompts from a short description.
pub struct PromptGenerator {
    gateway: Arc<dyn LlmGateway>,
    secrets: Arc<dyn SecretStore>,
    library: Arc<dyn PromptLibrary>,
}

impl PromptGenerator {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        secrets: Arc<dyn SecretStore>,
        library: Arc<dyn PromptLibrary>,
    ) -> Self {
        Self {
            gateway,
            secrets,
            library,
        }
    }

    /// Generate a prompt for `user_input` and store it in the session.
    ///
    /// One request, drained silently; the chat conversation is untouched.
    pub async fn generate(
        &self,
        ctx: &mut SessionContext,
        user_input: &str,
    ) -> Result<String, GeneratePromptError> {
        let user_input = user_input.trim();
        if user_input.is_empty() {
            return Err(GeneratePromptError::EmptyInput);
        }

        let api_key = ctx
            .resolve_api_key(self.secrets.as_ref())
            .ok_or(GeneratePromptError::MissingCredential)?;
        let generation_prompt = self.library.generation_prompt()?;

        let model = Model::prompt_generation();
        let budget = TokenBudget::clamped(GENERATION_MAX_TOKENS, model);
        let messages = [
            Message::system(generation_prompt),
            Message::user(user_input),
        ];

        info!(model = %model, "Generating assistant prompt");
        let session = self.gateway.create_session(&api_key).await?;
        let prompt = session
            .stream_completion(model, &messages, budget)
            .await?
            .collect_text()
            .await?;

        debug!(bytes = prompt.len(), "Prompt generated");
        ctx.set_generated_prompt(prompt.clone());
        Ok(prompt)
    }
}
