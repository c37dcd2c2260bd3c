//! Wire types for the OpenAI-compatible chat completions endpoint.
//!
//! # Protocol Overview
//!
//! - **Request**: `POST {base_url}/chat/completions` with `stream: true`
//! - **Response**: server-sent events, one `data: {chunk}` per event,
//!   events separated by a blank line, terminated by `data: [DONE]`
//! - **Errors**: `{"error": {"message", "type", "code"}}`, either as the
//!   HTTP error body or as a `data:` event inside the stream

use super::error::{GroqError, Result};
use serde::{Deserialize, Serialize};
use studio_domain::Message;

/// Sentinel payload that closes the event stream
pub const DONE_MARKER: &str = "[DONE]";

/// Streaming chat completion request
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub max_tokens: u32,
    pub stream: bool,
}

/// One streamed completion chunk
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Text carried by the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Error envelope returned by the API
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<String>,
}

impl ErrorEnvelope {
    pub fn into_error(self, status: Option<u16>) -> GroqError {
        GroqError::Api {
            status,
            code: self.error.code.or(self.error.kind),
            message: self.error.message,
        }
    }
}

/// Build an API error from an HTTP error response body.
///
/// Falls back to the raw body when it is not a JSON error envelope.
pub fn error_from_body(status: u16, body: &str) -> GroqError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.into_error(Some(status)),
        Err(_) => GroqError::Api {
            status: Some(status),
            code: None,
            message: if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body.trim().to_string()
            },
        },
    }
}

/// A decoded server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// JSON payload of a `data:` event
    Data(String),
    /// The `[DONE]` terminator
    Done,
}

/// Incremental SSE decoder.
///
/// Network chunks may split an event (or a UTF-8 sequence) anywhere, so
/// bytes are buffered until a blank line completes an event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns every event completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend(bytes.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(end) = find_event_end(&self.buffer) {
            let raw: Vec<u8> = self.buffer.drain(..end + 2).collect();
            let text = String::from_utf8_lossy(&raw[..end]);
            if let Some(event) = decode_event(&text) {
                events.push(event);
            }
        }
        events
    }

    /// Bytes received but not yet part of a complete event.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Decode whatever is left once the body has ended.
    ///
    /// A final event is not always followed by a blank line; it still counts.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let raw = std::mem::take(&mut self.buffer);
        decode_event(&String::from_utf8_lossy(&raw))
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Decode one event block; comments and non-data fields are ignored.
fn decode_event(block: &str) -> Option<SseEvent> {
    let data: Vec<&str> = block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|d| d.strip_prefix(' ').unwrap_or(d))
        .collect();
    if data.is_empty() {
        return None;
    }

    let payload = data.join("\n");
    let payload = payload.trim();
    if payload.is_empty() {
        None
    } else if payload == DONE_MARKER {
        Some(SseEvent::Done)
    } else {
        Some(SseEvent::Data(payload.to_string()))
    }
}

/// Interpret one `data:` payload.
///
/// Returns the text fragment it carries (`None` for role-only or empty
/// deltas) or the API error it reports.
pub fn parse_data(payload: &str) -> Result<Option<String>> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| GroqError::ParseError {
            error: e.to_string(),
            raw: payload.to_string(),
        })?;

    if value.get("error").is_some() {
        let envelope: ErrorEnvelope = serde_json::from_value(value)?;
        return Err(envelope.into_error(None));
    }

    let chunk: ChatCompletionChunk =
        serde_json::from_value(value).map_err(|e| GroqError::ParseError {
            error: e.to_string(),
            raw: payload.to_string(),
        })?;
    Ok(chunk.content().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let messages = [Message::system("Sys"), Message::user("Hi")];
        let request = ChatCompletionRequest {
            model: "llama3-70b-8192",
            messages: &messages,
            max_tokens: 1024,
            stream: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3-70b-8192");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hi");
    }

    #[test]
    fn test_decoder_handles_split_events() {
        let mut decoder = SseDecoder::new();
        let first = decoder.push(b"data: {\"a\":");
        assert!(first.is_empty());
        assert!(decoder.pending() > 0);

        let second = decoder.push(b"1}\n\ndata: [DONE]\n\n");
        assert_eq!(
            second,
            vec![SseEvent::Data("{\"a\":1}".to_string()), SseEvent::Done]
        );
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_decoder_handles_split_utf8() {
        let bytes = "data: {\"c\":\"é\"}\n\n".as_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&bytes[..split]).is_empty());
        let events = decoder.push(&bytes[split..]);
        assert_eq!(events, vec![SseEvent::Data("{\"c\":\"é\"}".to_string())]);
    }

    #[test]
    fn test_decoder_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: {\"a\":1}\n\ndata: {\"b\":2}\n");
        assert_eq!(events, vec![SseEvent::Data("{\"a\":1}".to_string())]);
        assert!(decoder.pending() > 0);

        assert_eq!(decoder.finish(), Some(SseEvent::Data("{\"b\":2}".to_string())));
        assert_eq!(decoder.pending(), 0);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_decoder_accepts_crlf_and_comments() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\r\n\r\ndata: {}\r\n\r\n");
        assert_eq!(events, vec![SseEvent::Data("{}".to_string())]);
    }

    #[test]
    fn test_parse_data_content() {
        let payload = r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#;
        assert_eq!(parse_data(payload).unwrap(), Some("Hel".to_string()));
    }

    #[test]
    fn test_parse_data_skips_empty_deltas() {
        let role_only = r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#;
        assert_eq!(parse_data(role_only).unwrap(), None);

        let finished = r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}],"x_groq":{"usage":{}}}"#;
        assert_eq!(parse_data(finished).unwrap(), None);
    }

    #[test]
    fn test_parse_data_reports_in_stream_error() {
        let payload = r#"{"error":{"message":"Rate limit reached","type":"tokens","code":"rate_limit_exceeded"}}"#;
        let err = parse_data(payload).unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "Rate limit reached");
    }

    #[test]
    fn test_parse_data_rejects_garbage() {
        assert!(matches!(
            parse_data("not json"),
            Err(GroqError::ParseError { .. })
        ));
    }

    #[test]
    fn test_error_from_body() {
        let body = r#"{"error":{"message":"The model `x` does not exist","type":"invalid_request_error","code":"model_not_found"}}"#;
        match error_from_body(404, body) {
            GroqError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, Some(404));
                assert_eq!(code.as_deref(), Some("model_not_found"));
                assert_eq!(message, "The model `x` does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = error_from_body(502, "");
        assert_eq!(err.to_string(), "HTTP 502");
    }
}
