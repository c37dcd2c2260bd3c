//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the closed catalog of hosted models and their token limits
//! - [`model::TokenBudget`]: a requested response length, bounded per model
//! - [`prompt::UserPrompt`]: a validated, non-empty chat submission
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod prompt;
pub mod string;
