//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod chat_turn;
pub mod generate_prompt;
pub mod manage_assistants;
