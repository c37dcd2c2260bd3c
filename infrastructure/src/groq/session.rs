//! Groq session management.
//!
//! Provides [`GroqSession`] which implements [`LlmSession`] by issuing one
//! streaming chat completion request per call.

use crate::groq::error::{GroqError, Result};
use crate::groq::protocol::{ChatCompletionRequest, SseDecoder, SseEvent, error_from_body, parse_data};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use studio_application::ports::llm_gateway::{
    FragmentStream, GatewayError, LlmSession, StreamHandle,
};
use studio_application::ports::secret_store::ApiKey;
use studio_domain::{Message, Model, TokenBudget};
use tracing::{debug, info, warn};

/// An authenticated connection to the Groq chat completions endpoint.
pub struct GroqSession {
    client: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
    read_timeout: Duration,
}

impl GroqSession {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: ApiKey,
        read_timeout: Duration,
    ) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            read_timeout,
        }
    }

    /// Send the request and check the HTTP status.
    ///
    /// Errors before the first byte of the body (auth, validation,
    /// throttling) surface here rather than inside the stream. Waiting for
    /// the response headers is bounded by `read_timeout` as well.
    async fn open(
        &self,
        model: Model,
        messages: &[Message],
        max_tokens: TokenBudget,
    ) -> Result<reqwest::Response> {
        let request = ChatCompletionRequest {
            model: model.as_str(),
            messages,
            max_tokens: max_tokens.get(),
            stream: true,
        };

        let send = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .header("Accept", "text/event-stream")
            .json(&request)
            .send();
        let response = tokio::time::timeout(self.read_timeout, send)
            .await
            .map_err(|_| GroqError::Timeout)??;

        let status = response.status();
        if !status.is_success() {
            let body = tokio::time::timeout(self.read_timeout, response.text())
                .await
                .ok()
                .and_then(|body| body.ok())
                .unwrap_or_default();
            warn!("Completion request rejected with HTTP {}", status.as_u16());
            return Err(error_from_body(status.as_u16(), &body));
        }
        Ok(response)
    }
}

/// Turn the SSE body into a stream of text fragments.
///
/// Each read is bounded by `read_timeout`; a stall fails the stream with
/// [`GatewayError::Timeout`].
fn fragments(response: reqwest::Response, read_timeout: Duration) -> FragmentStream {
    Box::pin(try_stream! {
        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut count = 0usize;

        'read: loop {
            let next = tokio::time::timeout(read_timeout, body.next())
                .await
                .map_err(|_| GatewayError::from(GroqError::Timeout))?;
            let Some(chunk) = next else {
                match decoder.finish() {
                    Some(SseEvent::Data(payload)) => {
                        warn!("Stream ended inside an event; decoding the remainder");
                        if let Some(text) = parse_data(&payload).map_err(GatewayError::from)? {
                            count += 1;
                            yield text;
                        }
                    }
                    Some(SseEvent::Done) => {}
                    None => debug!("Stream closed without a [DONE] marker"),
                }
                break 'read;
            };
            let chunk = chunk.map_err(|e| GatewayError::from(GroqError::Client(e)))?;

            for event in decoder.push(&chunk) {
                let payload = match event {
                    SseEvent::Done => break 'read,
                    SseEvent::Data(payload) => payload,
                };
                if let Some(text) = parse_data(&payload).map_err(GatewayError::from)? {
                    count += 1;
                    yield text;
                }
            }
        }

        debug!(fragments = count, "Stream finished");
    })
}

#[async_trait]
impl LlmSession for GroqSession {
    async fn stream_completion(
        &self,
        model: Model,
        messages: &[Message],
        max_tokens: TokenBudget,
    ) -> std::result::Result<StreamHandle, GatewayError> {
        info!(
            "Requesting completion from {} ({} messages, max_tokens={})",
            model,
            messages.len(),
            max_tokens
        );
        let response = self.open(model, messages, max_tokens).await?;
        Ok(StreamHandle::new(fragments(response, self.read_timeout)))
    }
}
