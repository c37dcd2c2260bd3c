//! Assistant domain.
//!
//! An assistant is a named system prompt. The [`registry::AssistantRegistry`]
//! holds one session's assistants; [`preset`] derives display names for
//! prompt files loaded from disk.

pub mod preset;
pub mod registry;
