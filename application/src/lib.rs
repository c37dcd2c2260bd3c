//! Application layer for customai-studio
//!
//! This crate contains use cases, port definitions and the per-session
//! context. It depends only on the domain layer.

pub mod ports;
pub mod session;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    fragment_sink::{FragmentSink, NoFragmentSink},
    llm_gateway::{FragmentStream, GatewayError, LlmGateway, LlmSession, StreamHandle},
    prompt_library::{PromptLibrary, PromptLibraryError},
    secret_store::{ApiKey, NoSecrets, SecretStore},
};
pub use session::SessionContext;
pub use use_cases::chat_turn::{ChatError, ChatOrchestrator, ChatReply, Severity};
pub use use_cases::generate_prompt::{GENERATION_MAX_TOKENS, GeneratePromptError, PromptGenerator};
pub use use_cases::manage_assistants::{
    AssistantError, AssistantService, CreateReport, DeleteReport, PromptSource,
};
