//! Progress and streaming output

pub mod reporter;
pub mod stream;
