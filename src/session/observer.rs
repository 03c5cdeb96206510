//! Callbacks a session reports to.

use crate::error::StreamError;
use crate::models::ChatResponse;
use crate::protocol::EventFrame;
use crate::state::AgentTaskStatus;

/// One non-terminal frame as seen by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingChunk {
    /// The frame itself
    pub frame: EventFrame,
    /// Text this frame added to the response (empty for non-text frames)
    pub text: String,
    /// Full response text so far
    pub accumulated: String,
    /// True for pieces re-emitted from a whole response
    pub synthetic: bool,
}

impl StreamingChunk {
    pub fn is_text(&self) -> bool {
        matches!(self.frame, EventFrame::Token { .. })
    }
}

/// Receives a session's events.
///
/// Calls happen inline while the session handles a frame. At most one of
/// `on_complete` / `on_error` fires per session, and neither fires after a
/// cancellation.
pub trait StreamObserver: Send {
    fn on_chunk(&mut self, _chunk: &StreamingChunk) {}

    fn on_complete(&mut self, _response: &ChatResponse) {}

    fn on_error(&mut self, _error: &StreamError) {}

    fn on_agent_task(&mut self, _task_id: &str, _status: &AgentTaskStatus, _progress: f64) {}
}

/// Observer that ignores everything; the outcome of `send` is enough
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StreamObserver for NoopObserver {}
