//! LLM Gateway port
//!
//! Defines the interface for streaming chat completions from the hosted API.

use super::fragment_sink::FragmentSink;
use super::secret_store::ApiKey;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use studio_domain::{Message, Model, TokenBudget};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
///
/// Adapters classify upstream failures into these variants; nothing above
/// the adapter inspects error text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timed out waiting for the model")]
    Timeout,

    #[error("Malformed stream: {0}")]
    MalformedStream(String),
}

impl GatewayError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited(_))
    }
}

/// A lazily produced sequence of text fragments.
pub type FragmentStream = BoxStream<'static, Result<String, GatewayError>>;

/// Handle for consuming one streaming completion.
///
/// The sequence is finite and single-use: once drained (or failed) a new
/// request is needed. It can be consumed in two ways:
///
/// - [`forward_to`](Self::forward_to): hand each fragment to a sink as it
///   arrives, returning the concatenation at the end
/// - [`collect_text`](Self::collect_text): drain silently into one string
pub struct StreamHandle {
    stream: FragmentStream,
}

impl StreamHandle {
    pub fn new(stream: FragmentStream) -> Self {
        Self { stream }
    }

    /// Build a handle over a fixed script of fragments and failures.
    pub fn from_results(items: Vec<Result<String, GatewayError>>) -> Self {
        Self::new(stream::iter(items).boxed())
    }

    /// Pull the next fragment, `None` once the upstream stream has ended.
    pub async fn next_fragment(&mut self) -> Option<Result<String, GatewayError>> {
        self.stream.next().await
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(fragment) = self.next_fragment().await {
            full_text.push_str(&fragment?);
        }
        Ok(full_text)
    }

    /// Forward every fragment to `sink` while accumulating the full text.
    ///
    /// On failure the fragments already rendered stay rendered, but the
    /// partial text is dropped.
    pub async fn forward_to(mut self, sink: &dyn FragmentSink) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        let result = loop {
            match self.next_fragment().await {
                Some(Ok(fragment)) => {
                    sink.on_fragment(&fragment);
                    full_text.push_str(&fragment);
                }
                Some(Err(e)) => break Err(e),
                None => break Ok(full_text),
            }
        };
        sink.on_stream_end();
        result
    }
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Open an authenticated session with the provider.
    async fn create_session(&self, api_key: &ApiKey) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An authenticated connection to the completion API
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Start one streaming chat completion over `messages`, in order.
    ///
    /// Single attempt: no retry and no caching.
    async fn stream_completion(
        &self,
        model: Model,
        messages: &[Message],
        max_tokens: TokenBudget,
    ) -> Result<StreamHandle, GatewayError>;
}
