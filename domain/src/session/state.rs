//! Chat turn lifecycle

/// Where the current chat turn stands.
///
/// ```text
/// Idle -> AwaitingSubmission -> Streaming -> Committed -> Idle
///                                        \-> Failed    -> Idle
/// ```
///
/// `Committed` and `Failed` are momentary; the orchestrator settles back to
/// `Idle` once the outcome has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingSubmission,
    Streaming,
    Committed,
    Failed,
}

impl ChatState {
    /// Whether a new submission may start from this state.
    pub fn accepts_submission(&self) -> bool {
        !matches!(self, ChatState::AwaitingSubmission | ChatState::Streaming)
    }

    /// Whether `next` is a legal successor of this state.
    ///
    /// Any state may fall back to `Idle` (clear chat, cancellation).
    pub fn can_transition_to(&self, next: ChatState) -> bool {
        use ChatState::*;
        matches!(
            (self, next),
            (_, Idle)
                | (Idle, AwaitingSubmission)
                | (Committed, AwaitingSubmission)
                | (Failed, AwaitingSubmission)
                | (AwaitingSubmission, Streaming)
                | (AwaitingSubmission, Failed)
                | (Streaming, Committed)
                | (Streaming, Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatState::Idle => "idle",
            ChatState::AwaitingSubmission => "awaiting_submission",
            ChatState::Streaming => "streaming",
            ChatState::Committed => "committed",
            ChatState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
