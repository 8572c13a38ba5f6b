//! Per-user conversation state

/// Identifier handed to us by the messaging transport.
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// The user asked to convert and the next text message is the amount.
    AwaitingAmount,
}
