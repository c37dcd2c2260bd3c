//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod fragment_sink;
pub mod llm_gateway;
pub mod prompt_library;
pub mod secret_store;
