//! Per-session state
//!
//! [`SessionContext`] owns everything that lives for one user session: the
//! credential entered at runtime, the assistant registry and selection, the
//! model and token budget, and the conversation log. Use cases receive it
//! explicitly; nothing is global.

use crate::ports::secret_store::{ApiKey, SecretStore};
use studio_domain::{
    AssistantRegistry, ConversationSession, DomainError, Model, TokenBudget,
};
use tracing::debug;

/// State owned by one user session.
///
/// Mutation requires `&mut self`, so interactions within a session are
/// serialized by construction.
#[derive(Debug, Default)]
pub struct SessionContext {
    api_key: Option<ApiKey>,
    assistants: Option<AssistantRegistry>,
    selected_assistant: Option<String>,
    model: Model,
    budget: Option<TokenBudget>,
    conversation: ConversationSession,
    generated_prompt: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Credential ====================

    /// Store a key entered by the user for the rest of the session.
    pub fn set_api_key(&mut self, key: ApiKey) {
        self.api_key = Some(key);
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Session key first, then the secret store.
    ///
    /// A key found in the store is copied into the session.
    pub fn resolve_api_key(&mut self, secrets: &dyn SecretStore) -> Option<ApiKey> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        let key = secrets.api_key()?;
        debug!("API key loaded from secret store");
        self.api_key = Some(key.clone());
        Some(key)
    }

    // ==================== Assistants ====================

    /// `None` until the registry has been seeded for this session.
    pub fn assistants(&self) -> Option<&AssistantRegistry> {
        self.assistants.as_ref()
    }

    pub fn assistants_mut(&mut self) -> Option<&mut AssistantRegistry> {
        self.assistants.as_mut()
    }

    /// The registry, seeding it with only the built-in assistant if missing.
    pub fn assistants_or_builtin(&mut self) -> &AssistantRegistry {
        self.assistants
            .get_or_insert_with(|| AssistantRegistry::seeded([]))
    }

    pub fn install_assistants(&mut self, registry: AssistantRegistry) {
        self.assistants = Some(registry);
    }

    pub fn selected_assistant(&self) -> Option<&str> {
        self.selected_assistant.as_deref()
    }

    /// Select an assistant that exists in the registry.
    pub fn select_assistant(&mut self, name: &str) -> Result<(), DomainError> {
        let exists = self.assistants.as_ref().is_some_and(|r| r.contains(name));
        if !exists {
            return Err(DomainError::AssistantNotFound(name.to_string()));
        }
        self.selected_assistant = Some(name.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_assistant = None;
    }

    /// System prompt of the selected assistant, if one is selected.
    pub fn selected_prompt(&self) -> Option<Result<&str, DomainError>> {
        let name = self.selected_assistant.as_deref()?;
        Some(match &self.assistants {
            Some(registry) => registry.get(name),
            None => Err(DomainError::AssistantNotFound(name.to_string())),
        })
    }

    // ==================== Model & budget ====================

    pub fn model(&self) -> Model {
        self.model
    }

    /// Switch models; the current budget is re-clamped to the new limit.
    pub fn select_model(&mut self, model: Model) {
        self.model = model;
        self.budget = self.budget.map(|b| b.for_model(model));
    }

    /// The requested budget, or the model's default if none was chosen.
    pub fn budget(&self) -> TokenBudget {
        self.budget
            .unwrap_or_else(|| TokenBudget::default_for(self.model))
    }

    /// Request a budget; returns the clamped value actually stored.
    pub fn set_budget(&mut self, requested: u32) -> TokenBudget {
        let budget = TokenBudget::clamped(requested, self.model);
        self.budget = Some(budget);
        budget
    }

    // ==================== Conversation ====================

    pub fn conversation(&self) -> &ConversationSession {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut ConversationSession {
        &mut self.conversation
    }

    // ==================== Prompt generation ====================

    pub fn generated_prompt(&self) -> Option<&str> {
        self.generated_prompt.as_deref()
    }

    pub fn set_generated_prompt(&mut self, prompt: impl Into<String>) {
        self.generated_prompt = Some(prompt.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::secret_store::NoSecrets;
    use studio_domain::Assistant;

    struct FixedSecret(&'static str);

    impl SecretStore for FixedSecret {
        fn api_key(&self) -> Option<ApiKey> {
            ApiKey::new(self.0)
        }
    }

    #[test]
    fn test_session_key_wins_over_store() {
        let mut ctx = SessionContext::new();
        ctx.set_api_key(ApiKey::new("session").unwrap());
        let key = ctx.resolve_api_key(&FixedSecret("store")).unwrap();
        assert_eq!(key.expose(), "session");
    }

    #[test]
    fn test_store_key_is_copied_into_session() {
        let mut ctx = SessionContext::new();
        assert!(!ctx.has_api_key());
        let key = ctx.resolve_api_key(&FixedSecret("store")).unwrap();
        assert_eq!(key.expose(), "store");
        assert!(ctx.has_api_key());
    }

    #[test]
    fn test_no_key_anywhere() {
        let mut ctx = SessionContext::new();
        assert!(ctx.resolve_api_key(&NoSecrets).is_none());
    }

    #[test]
    fn test_select_requires_existing_assistant() {
        let mut ctx = SessionContext::new();
        assert!(ctx.select_assistant("Default").is_err());

        ctx.install_assistants(AssistantRegistry::seeded([Assistant::new("Poet", "rhyme")]));
        ctx.select_assistant("Poet").unwrap();
        assert_eq!(ctx.selected_assistant(), Some("Poet"));
        assert_eq!(ctx.selected_prompt(), Some(Ok("rhyme")));

        assert_eq!(
            ctx.select_assistant("Ghost"),
            Err(DomainError::AssistantNotFound("Ghost".to_string()))
        );
        assert_eq!(ctx.selected_assistant(), Some("Poet"));
    }

    #[test]
    fn test_budget_defaults_and_clamps() {
        let mut ctx = SessionContext::new();
        assert_eq!(ctx.model(), Model::Llama3_70b);
        assert_eq!(ctx.budget().get(), 8192);

        assert_eq!(ctx.set_budget(1).get(), TokenBudget::MIN);
        ctx.select_model(Model::Mixtral8x7b);
        assert_eq!(ctx.set_budget(20_000).get(), 19_840);

        ctx.select_model(Model::Gemma7bIt);
        assert_eq!(ctx.budget().get(), 8192);
    }

    #[test]
    fn test_default_budget_follows_model_until_set() {
        let mut ctx = SessionContext::new();
        ctx.select_model(Model::Mixtral8x7b);
        assert_eq!(ctx.budget().get(), 32768);
    }
}
