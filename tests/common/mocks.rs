//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `chatstream::adapters::mock` and adds a recording observer.

pub use chatstream::adapters::mock::{
    sse_chunks, MockHttpClient, MockResponse, MockWsConnector, MockWsEnding,
};
pub use chatstream::traits::{HttpError, Response};
pub use chatstream::websocket::WsError;

use chatstream::error::StreamError;
use chatstream::models::ChatResponse;
use chatstream::session::{StreamObserver, StreamingChunk};
use chatstream::state::AgentTaskStatus;

/// One `on_agent_task` call
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEvent {
    pub task_id: String,
    pub status: AgentTaskStatus,
    pub progress: f64,
}

/// Observer that keeps every callback it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub chunks: Vec<StreamingChunk>,
    pub completed: Vec<ChatResponse>,
    pub errors: Vec<StreamError>,
    pub tasks: Vec<TaskEvent>,
}

impl RecordingObserver {
    /// Text of every chunk that carried any, in order
    pub fn texts(&self) -> Vec<String> {
        self.chunks
            .iter()
            .filter(|c| !c.text.is_empty())
            .map(|c| c.text.clone())
            .collect()
    }

    /// Number of terminal callbacks (`on_complete` + `on_error`)
    pub fn terminal_calls(&self) -> usize {
        self.completed.len() + self.errors.len()
    }

    pub fn completed_once(&self) -> &ChatResponse {
        assert_eq!(self.completed.len(), 1, "expected exactly one on_complete");
        assert!(self.errors.is_empty(), "unexpected on_error: {:?}", self.errors);
        &self.completed[0]
    }
}

impl StreamObserver for RecordingObserver {
    fn on_chunk(&mut self, chunk: &StreamingChunk) {
        self.chunks.push(chunk.clone());
    }

    fn on_complete(&mut self, response: &ChatResponse) {
        self.completed.push(response.clone());
    }

    fn on_error(&mut self, error: &StreamError) {
        self.errors.push(error.clone());
    }

    fn on_agent_task(&mut self, task_id: &str, status: &AgentTaskStatus, progress: f64) {
        self.tasks.push(TaskEvent {
            task_id: task_id.to_string(),
            status: status.clone(),
            progress,
        });
    }
}
