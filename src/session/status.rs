//! Session lifecycle states.

use serde::Serialize;
use std::fmt;

/// Lifecycle of a stream session.
///
/// `Idle -> Connecting -> Streaming -> {Completed | Degraded | Failed | Cancelled}`,
/// where `Connecting` may also go straight to a terminal state. Transitions
/// only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Connecting,
    Streaming,
    /// Finished with a `done` frame
    Completed,
    /// Finished with a fallback response
    Degraded,
    /// Finished through the error path
    Failed,
    /// Cancelled by the caller
    Cancelled,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Completed
                | SessionStatus::Degraded
                | SessionStatus::Failed
                | SessionStatus::Cancelled
        )
    }

    fn rank(&self) -> u8 {
        match self {
            SessionStatus::Idle => 0,
            SessionStatus::Connecting => 1,
            SessionStatus::Streaming => 2,
            _ => 3,
        }
    }

    /// True if moving from `self` to `next` goes forward
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Connecting => "connecting",
            SessionStatus::Streaming => "streaming",
            SessionStatus::Completed => "completed",
            SessionStatus::Degraded => "degraded",
            SessionStatus::Failed => "failed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
