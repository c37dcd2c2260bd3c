//! Groq adapter: streaming chat completions over the OpenAI-compatible API

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;
