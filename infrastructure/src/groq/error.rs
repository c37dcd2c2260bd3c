//! Error types for the Groq adapter

use studio_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Result type alias for Groq operations
pub type Result<T> = std::result::Result<T, GroqError>;

/// Error code the API uses for throttled requests
pub const RATE_LIMIT_CODE: &str = "rate_limit_exceeded";

/// HTTP status the API uses for throttled requests
pub const RATE_LIMIT_STATUS: u16 = 429;

/// Errors that can occur when talking to the Groq API
#[derive(Error, Debug)]
pub enum GroqError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{message}")]
    Api {
        status: Option<u16>,
        code: Option<String>,
        message: String,
    },

    #[error("Failed to parse stream event: {error}\nRaw event: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Request timeout")]
    Timeout,
}

impl GroqError {
    /// Whether the provider throttled this request.
    ///
    /// Matches HTTP 429, the `rate_limit_exceeded` error code, or that code
    /// appearing in the message for errors that arrive without structure.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GroqError::Api {
                status,
                code,
                message,
            } => {
                *status == Some(RATE_LIMIT_STATUS)
                    || code.as_deref() == Some(RATE_LIMIT_CODE)
                    || message.contains(RATE_LIMIT_CODE)
            }
            GroqError::Client(e) => e.status().map(|s| s.as_u16()) == Some(RATE_LIMIT_STATUS),
            _ => false,
        }
    }
}

impl From<GroqError> for GatewayError {
    fn from(error: GroqError) -> Self {
        if error.is_rate_limited() {
            return GatewayError::RateLimited(error.to_string());
        }
        match error {
            GroqError::Api {
                status, message, ..
            } => GatewayError::Api { status, message },
            GroqError::Client(e) if e.is_timeout() => GatewayError::Timeout,
            GroqError::Client(e) if e.is_connect() || e.is_request() => {
                GatewayError::ConnectionError(e.to_string())
            }
            GroqError::Client(e) => GatewayError::Api {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            GroqError::Timeout => GatewayError::Timeout,
            GroqError::Serialization(e) => GatewayError::MalformedStream(e.to_string()),
            GroqError::ParseError { error, .. } => GatewayError::MalformedStream(error),
        }
    }
}
