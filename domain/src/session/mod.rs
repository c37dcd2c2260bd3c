//! Conversation domain.
//!
//! - [`entities::Message`]: a single role-tagged message
//! - [`entities::ConversationSession`]: the append-only log replayed on every request
//! - [`state::ChatState`]: lifecycle of one chat turn

pub mod entities;
pub mod state;
