//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface with slash commands
//! for managing assistants, models and the API key.

pub mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
