//! Chat turn use case.
//!
//! [`ChatOrchestrator`] runs one user submission end to end:
//!
//! 1. Check preconditions (prompt, selected assistant, API key)
//! 2. Append the assistant's system prompt and the user message
//! 3. Stream a completion over the whole history, forwarding fragments to a sink
//! 4. Commit the assembled reply, or commit nothing on failure
//!
//! It is also the single place where gateway errors become user-facing
//! messages (see [`ChatError`]).

use crate::ports::fragment_sink::FragmentSink;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::secret_store::SecretStore;
use crate::session::SessionContext;
use std::sync::{Arc, Mutex};
use studio_domain::{ChatState, DomainError, Model, UserPrompt, truncate};
use thiserror::Error;
use tracing::{debug, info, warn};

/// How loudly a [`ChatError`] should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing can proceed until the user fixes it
    Fatal,
    /// The request failed
    Error,
    /// The request finished but produced nothing usable
    Warning,
    /// Informational; the user can simply try again
    Notice,
}

/// Errors surfaced by a chat turn
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("API Key is required to proceed.")]
    MissingCredential,

    #[error("{0}")]
    NotFound(DomainError),

    #[error("Rate limit exceeded. Please try again in a few moments.")]
    RateLimited(String),

    #[error("{0}")]
    Api(String),

    #[error("No response was generated.")]
    EmptyResponse,

    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("No assistant selected. Pick one before chatting.")]
    NoAssistantSelected,

    #[error("A response is still streaming; wait for it to finish.")]
    Busy,
}

impl ChatError {
    /// Map a gateway failure to the user-facing taxonomy.
    ///
    /// API errors keep the provider's message verbatim.
    pub fn from_gateway(error: GatewayError) -> Self {
        match error {
            GatewayError::RateLimited(detail) => ChatError::RateLimited(detail),
            GatewayError::Api { message, .. } => ChatError::Api(message),
            other => ChatError::Api(other.to_string()),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ChatError::MissingCredential => Severity::Fatal,
            ChatError::RateLimited(_) | ChatError::Api(_) => Severity::Error,
            ChatError::EmptyResponse => Severity::Warning,
            ChatError::NotFound(_)
            | ChatError::EmptyPrompt
            | ChatError::NoAssistantSelected
            | ChatError::Busy => Severity::Notice,
        }
    }

    /// The message to show the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Follow-up advice shown under the message, if any.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            ChatError::MissingCredential => {
                Some("Set GROQ_API_KEY, add api_key to the config file, or use /key <key>.")
            }
            ChatError::RateLimited(_) => Some(
                "To avoid this issue in the future, consider using your own API key to manage rate limits independently.",
            ),
            ChatError::NoAssistantSelected | ChatError::NotFound(_) => {
                Some("Use /assistants to list assistants and /use <name> to select one.")
            }
            _ => None,
        }
    }
}

/// A committed assistant reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub content: String,
    pub model: Model,
}

/// Runs chat turns for one session.
///
/// At most one turn is in flight at a time; a second submission while a
/// stream is open is rejected with [`ChatError::Busy`].
pub struct ChatOrchestrator {
    gateway: Arc<dyn LlmGateway>,
    secrets: Arc<dyn SecretStore>,
    state: Mutex<ChatState>,
}

impl ChatOrchestrator {
    pub fn new(gateway: Arc<dyn LlmGateway>, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            gateway,
            secrets,
            state: Mutex::new(ChatState::Idle),
        }
    }

    pub fn state(&self) -> ChatState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one chat turn, streaming the reply into `sink`.
    ///
    /// On success the reply has been appended to the conversation. On any
    /// failure after the user message was appended, no assistant message is
    /// added; the user message stays.
    pub async fn submit(
        &self,
        ctx: &mut SessionContext,
        prompt: &str,
        sink: &dyn FragmentSink,
    ) -> Result<ChatReply, ChatError> {
        let turn = self.begin()?;

        let prompt = UserPrompt::try_new(prompt).map_err(|_| ChatError::EmptyPrompt)?;
        let system_prompt = match ctx.selected_prompt() {
            None => return Err(ChatError::NoAssistantSelected),
            Some(Err(e)) => return Err(ChatError::NotFound(e)),
            Some(Ok(p)) => p.to_string(),
        };
        let api_key = ctx
            .resolve_api_key(self.secrets.as_ref())
            .ok_or(ChatError::MissingCredential)?;

        let model = ctx.model();
        let budget = ctx.budget();

        let session = self.gateway.create_session(&api_key).await.map_err(|e| {
            turn.set(ChatState::Failed);
            ChatError::from_gateway(e)
        })?;

        let conversation = ctx.conversation_mut();
        conversation.append_system(system_prompt);
        conversation.append_user(prompt.into_content());

        info!(
            model = %model,
            max_tokens = budget.get(),
            messages = conversation.len(),
            "Starting chat completion"
        );

        turn.set(ChatState::Streaming);
        sink.on_stream_start(model);
        let streamed = match session
            .stream_completion(model, conversation.history(), budget)
            .await
        {
            Ok(handle) => handle.forward_to(sink).await,
            Err(e) => {
                sink.on_stream_end();
                Err(e)
            }
        };

        let text = match streamed {
            Ok(text) => text,
            Err(e) => {
                warn!("Chat completion failed: {}", e);
                turn.set(ChatState::Failed);
                return Err(ChatError::from_gateway(e));
            }
        };

        if text.is_empty() {
            warn!("Chat completion produced no content");
            turn.set(ChatState::Failed);
            return Err(ChatError::EmptyResponse);
        }

        debug!("Assistant reply: {}", truncate(&text, 120));
        ctx.conversation_mut().append_assistant(text.clone());
        turn.set(ChatState::Committed);
        info!(bytes = text.len(), "Chat turn committed");

        Ok(ChatReply {
            content: text,
            model,
        })
    }

    /// Clear the conversation and settle back to `Idle`.
    ///
    /// A turn in flight on another session keeps its slot; its guard returns
    /// the orchestrator to `Idle` when that turn ends.
    pub fn clear_chat(&self, ctx: &mut SessionContext) {
        ctx.conversation_mut().reset();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.accepts_submission() {
            *state = ChatState::Idle;
        } else {
            debug!("Chat cleared while another turn is {}", *state);
        }
        info!("Chat cleared");
    }

    /// Claim the turn slot, or fail with `Busy` if a turn is in flight.
    fn begin(&self) -> Result<TurnGuard<'_>, ChatError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.accepts_submission() {
            return Err(ChatError::Busy);
        }
        *state = ChatState::AwaitingSubmission;
        Ok(TurnGuard { state: &self.state })
    }
}

/// Returns the orchestrator to `Idle` when the turn ends, including when the
/// turn's future is dropped mid-stream.
struct TurnGuard<'a> {
    state: &'a Mutex<ChatState>,
}

impl TurnGuard<'_> {
    fn set(&self, next: ChatState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        debug_assert!(state.can_transition_to(next), "{} -> {}", *state, next);
        *state = next;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = ChatState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::fragment_sink::NoFragmentSink;
    use crate::ports::llm_gateway::{LlmSession, StreamHandle};
    use crate::ports::secret_store::{ApiKey, NoSecrets};
    use async_trait::async_trait;
    use futures::stream::{self, StreamExt};
    use std::collections::VecDeque;
    use studio_domain::{Assistant, AssistantRegistry, Message, Role, TokenBudget};

    // ==================== Test Mocks ====================

    type Script = Vec<Result<String, GatewayError>>;

    /// Records every request and replays scripted streams in order.
    #[derive(Default)]
    struct MockGateway {
        scripts: Mutex<VecDeque<Script>>,
        requests: Arc<Mutex<Vec<(Model, Vec<Message>, TokenBudget)>>>,
    }

    impl MockGateway {
        fn with_scripts(scripts: Vec<Script>) -> Self {
            Self {
                scripts: Mutex::new(scripts.into()),
                requests: Arc::default(),
            }
        }

        fn requests(&self) -> Vec<(Model, Vec<Message>, TokenBudget)> {
            self.requests.lock().unwrap().clone()
        }
    }

    struct MockSession {
        script: Script,
        requests: Arc<Mutex<Vec<(Model, Vec<Message>, TokenBudget)>>>,
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn create_session(
            &self,
            _api_key: &ApiKey,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
            Ok(Box::new(MockSession {
                script,
                requests: self.requests.clone(),
            }))
        }
    }

    #[async_trait]
    impl LlmSession for MockSession {
        async fn stream_completion(
            &self,
            model: Model,
            messages: &[Message],
            max_tokens: TokenBudget,
        ) -> Result<StreamHandle, GatewayError> {
            self.requests
                .lock()
                .unwrap()
                .push((model, messages.to_vec(), max_tokens));
            Ok(StreamHandle::from_results(self.script.clone()))
        }
    }

    /// Session whose request itself is refused.
    struct RefusingGateway(GatewayError);

    struct RefusingSession(GatewayError);

    #[async_trait]
    impl LlmGateway for RefusingGateway {
        async fn create_session(
            &self,
            _api_key: &ApiKey,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            Ok(Box::new(RefusingSession(self.0.clone())))
        }
    }

    #[async_trait]
    impl LlmSession for RefusingSession {
        async fn stream_completion(
            &self,
            _model: Model,
            _messages: &[Message],
            _max_tokens: TokenBudget,
        ) -> Result<StreamHandle, GatewayError> {
            Err(self.0.clone())
        }
    }

    /// Session whose stream never yields, to observe the in-flight state.
    struct PendingGateway;

    struct PendingSession;

    #[async_trait]
    impl LlmGateway for PendingGateway {
        async fn create_session(
            &self,
            _api_key: &ApiKey,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            Ok(Box::new(PendingSession))
        }
    }

    #[async_trait]
    impl LlmSession for PendingSession {
        async fn stream_completion(
            &self,
            _model: Model,
            _messages: &[Message],
            _max_tokens: TokenBudget,
        ) -> Result<StreamHandle, GatewayError> {
            Ok(StreamHandle::new(stream::pending().boxed()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        fragments: Mutex<Vec<String>>,
        started: Mutex<Option<Model>>,
    }

    impl FragmentSink for RecordingSink {
        fn on_stream_start(&self, model: Model) {
            *self.started.lock().unwrap() = Some(model);
        }

        fn on_fragment(&self, fragment: &str) {
            self.fragments.lock().unwrap().push(fragment.to_string());
        }
    }

    fn ok(s: &str) -> Result<String, GatewayError> {
        Ok(s.to_string())
    }

    fn context_with_assistant(name: &str, prompt: &str) -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.install_assistants(AssistantRegistry::seeded([Assistant::new(name, prompt)]));
        ctx.select_assistant(name).unwrap();
        ctx.set_api_key(ApiKey::new("gsk_test").unwrap());
        ctx
    }

    fn orchestrator(gateway: Arc<dyn LlmGateway>) -> ChatOrchestrator {
        ChatOrchestrator::new(gateway, Arc::new(NoSecrets))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_happy_path_commits_reply() {
        let gateway = Arc::new(MockGateway::with_scripts(vec![vec![ok("Hel"), ok("lo")]]));
        let chat = orchestrator(gateway.clone());
        let mut ctx = context_with_assistant("A", "Sys");
        let sink = RecordingSink::default();

        let reply = chat.submit(&mut ctx, "Hi", &sink).await.unwrap();

        assert_eq!(reply.content, "Hello");
        assert_eq!(
            ctx.conversation().history(),
            &[
                Message::system("Sys"),
                Message::user("Hi"),
                Message::assistant("Hello"),
            ]
        );
        assert_eq!(*sink.fragments.lock().unwrap(), vec!["Hel", "lo"]);
        assert_eq!(*sink.started.lock().unwrap(), Some(Model::Llama3_70b));
        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_request_replays_entire_history() {
        let gateway = Arc::new(MockGateway::with_scripts(vec![
            vec![ok("First")],
            vec![ok("Second")],
        ]));
        let chat = orchestrator(gateway.clone());
        let mut ctx = context_with_assistant("A", "Sys");

        chat.submit(&mut ctx, "one", &NoFragmentSink).await.unwrap();
        ctx.set_budget(992);
        chat.submit(&mut ctx, "two", &NoFragmentSink).await.unwrap();

        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].1.len(), 2);
        assert_eq!(
            requests[1].1,
            vec![
                Message::system("Sys"),
                Message::user("one"),
                Message::assistant("First"),
                Message::system("Sys"),
                Message::user("two"),
            ]
        );
        assert_eq!(requests[1].2.get(), 992);
    }

    #[tokio::test]
    async fn test_switching_assistant_does_not_rewrite_history() {
        let gateway = Arc::new(MockGateway::with_scripts(vec![vec![ok("a")], vec![ok("b")]]));
        let chat = orchestrator(gateway.clone());
        let mut ctx = context_with_assistant("A", "Sys A");
        ctx.assistants_mut()
            .unwrap()
            .add(Assistant::new("B", "Sys B"));

        chat.submit(&mut ctx, "one", &NoFragmentSink).await.unwrap();
        ctx.select_assistant("B").unwrap();
        chat.submit(&mut ctx, "two", &NoFragmentSink).await.unwrap();

        let system: Vec<_> = ctx
            .conversation()
            .history()
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(system, vec!["Sys A", "Sys B"]);
    }

    #[tokio::test]
    async fn test_rate_limit_mid_stream_commits_nothing() {
        let gateway = Arc::new(MockGateway::with_scripts(vec![vec![
            ok("Par"),
            Err(GatewayError::RateLimited("rate_limit_exceeded".to_string())),
        ]]));
        let chat = orchestrator(gateway);
        let mut ctx = context_with_assistant("A", "Sys");
        let sink = RecordingSink::default();

        let err = chat.submit(&mut ctx, "Hi", &sink).await.unwrap_err();

        assert!(matches!(err, ChatError::RateLimited(_)));
        assert!(err.guidance().is_some());
        let history = ctx.conversation().history();
        assert_eq!(history.last(), Some(&Message::user("Hi")));
        assert!(history.iter().all(|m| m.role != Role::Assistant));
        assert_eq!(*sink.fragments.lock().unwrap(), vec!["Par"]);
        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_api_error_is_reported_verbatim() {
        let gateway = Arc::new(RefusingGateway(GatewayError::Api {
            status: Some(400),
            message: "context_length_exceeded".to_string(),
        }));
        let chat = orchestrator(gateway);
        let mut ctx = context_with_assistant("A", "Sys");

        let err = chat.submit(&mut ctx, "Hi", &NoFragmentSink).await.unwrap_err();

        assert_eq!(err, ChatError::Api("context_length_exceeded".to_string()));
        assert_eq!(err.user_message(), "context_length_exceeded");
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(ctx.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_stream_is_not_committed() {
        let gateway = Arc::new(MockGateway::with_scripts(vec![vec![]]));
        let chat = orchestrator(gateway);
        let mut ctx = context_with_assistant("A", "Sys");

        let err = chat.submit(&mut ctx, "Hi", &NoFragmentSink).await.unwrap_err();

        assert_eq!(err, ChatError::EmptyResponse);
        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(ctx.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_credential_appends_nothing() {
        let gateway = Arc::new(MockGateway::default());
        let chat = orchestrator(gateway.clone());
        let mut ctx = SessionContext::new();
        ctx.install_assistants(AssistantRegistry::seeded([]));
        ctx.select_assistant("Default").unwrap();

        let err = chat.submit(&mut ctx, "Hi", &NoFragmentSink).await.unwrap_err();

        assert_eq!(err, ChatError::MissingCredential);
        assert_eq!(err.severity(), Severity::Fatal);
        assert!(ctx.conversation().is_empty());
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_secret_store_supplies_key() {
        struct EnvLike;
        impl SecretStore for EnvLike {
            fn api_key(&self) -> Option<ApiKey> {
                ApiKey::new("from-store")
            }
        }

        let gateway = Arc::new(MockGateway::with_scripts(vec![vec![ok("yo")]]));
        let chat = ChatOrchestrator::new(gateway, Arc::new(EnvLike));
        let mut ctx = SessionContext::new();
        ctx.install_assistants(AssistantRegistry::seeded([]));
        ctx.select_assistant("Default").unwrap();

        chat.submit(&mut ctx, "Hi", &NoFragmentSink).await.unwrap();
        assert_eq!(ctx.api_key().map(|k| k.expose()), Some("from-store"));
    }

    #[tokio::test]
    async fn test_precondition_failures() {
        let chat = orchestrator(Arc::new(MockGateway::default()));

        let mut ctx = context_with_assistant("A", "Sys");
        let err = chat.submit(&mut ctx, "   ", &NoFragmentSink).await.unwrap_err();
        assert_eq!(err, ChatError::EmptyPrompt);

        ctx.clear_selection();
        let err = chat.submit(&mut ctx, "Hi", &NoFragmentSink).await.unwrap_err();
        assert_eq!(err, ChatError::NoAssistantSelected);

        assert!(ctx.conversation().is_empty());
        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_deleted_selection_is_not_found() {
        let chat = orchestrator(Arc::new(MockGateway::default()));
        let mut ctx = context_with_assistant("A", "Sys");
        ctx.assistants_mut().unwrap().delete("A");

        let err = chat.submit(&mut ctx, "Hi", &NoFragmentSink).await.unwrap_err();

        assert_eq!(
            err,
            ChatError::NotFound(DomainError::AssistantNotFound("A".to_string()))
        );
        assert!(ctx.conversation().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_submission_is_rejected() {
        let chat = orchestrator(Arc::new(PendingGateway));
        let mut first_ctx = context_with_assistant("A", "Sys");
        let mut second_ctx = context_with_assistant("A", "Sys");

        let first = chat.submit(&mut first_ctx, "Hi", &NoFragmentSink);
        tokio::pin!(first);

        // Drive the first turn until it is parked inside the stream
        tokio::select! {
            _ = &mut first => panic!("pending stream should not finish"),
            _ = tokio::task::yield_now() => {}
        }
        assert_eq!(chat.state(), ChatState::Streaming);

        let err = chat
            .submit(&mut second_ctx, "Again", &NoFragmentSink)
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::Busy);
        assert!(second_ctx.conversation().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_turn_returns_to_idle() {
        let chat = orchestrator(Arc::new(PendingGateway));
        let mut ctx = context_with_assistant("A", "Sys");

        {
            let turn = chat.submit(&mut ctx, "Hi", &NoFragmentSink);
            tokio::pin!(turn);
            tokio::select! {
                _ = &mut turn => panic!("pending stream should not finish"),
                _ = tokio::task::yield_now() => {}
            }
            assert_eq!(chat.state(), ChatState::Streaming);
        }

        assert_eq!(chat.state(), ChatState::Idle);
        assert_eq!(ctx.conversation().history().last(), Some(&Message::user("Hi")));
        assert_eq!(ctx.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_chat_resets_history() {
        let gateway = Arc::new(MockGateway::with_scripts(vec![vec![ok("Hello")]]));
        let chat = orchestrator(gateway);
        let mut ctx = context_with_assistant("A", "Sys");
        chat.submit(&mut ctx, "Hi", &NoFragmentSink).await.unwrap();

        chat.clear_chat(&mut ctx);

        assert!(ctx.conversation().is_empty());
        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_clear_chat_keeps_other_turn_in_flight() {
        let chat = orchestrator(Arc::new(PendingGateway));
        let mut streaming_ctx = context_with_assistant("A", "Sys");
        let mut other_ctx = context_with_assistant("A", "Sys");

        {
            let first = chat.submit(&mut streaming_ctx, "Hi", &NoFragmentSink);
            tokio::pin!(first);
            tokio::select! {
                _ = &mut first => panic!("pending stream should not finish"),
                _ = tokio::task::yield_now() => {}
            }
            assert_eq!(chat.state(), ChatState::Streaming);

            chat.clear_chat(&mut other_ctx);
            assert_eq!(chat.state(), ChatState::Streaming);

            let err = chat
                .submit(&mut other_ctx, "Again", &NoFragmentSink)
                .await
                .unwrap_err();
            assert_eq!(err, ChatError::Busy);
            assert!(other_ctx.conversation().is_empty());
        }

        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[test]
    fn test_gateway_error_mapping() {
        assert_eq!(
            ChatError::from_gateway(GatewayError::Timeout),
            ChatError::Api("Timed out waiting for the model".to_string())
        );
        assert!(matches!(
            ChatError::from_gateway(GatewayError::RateLimited("x".to_string())),
            ChatError::RateLimited(_)
        ));
    }
}
