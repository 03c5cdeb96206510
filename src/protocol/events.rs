//! Event frame types and definitions
//!
//! Contains the closed `EventFrame` enum shared by the SSE and WebSocket
//! transports. Every inbound frame is normalized into one of these variants
//! before the session sees it.

use serde::Serialize;
use serde_json::{Map, Value};

/// Typed events from the chat backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventFrame {
    /// The backend accepted the request and bound it to a conversation
    StreamStart { conversation_id: String },
    /// Text output. `content` may be a cumulative snapshot or an increment;
    /// `delta` is always an increment.
    Token {
        #[serde(skip_serializing_if = "String::is_empty")]
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        delta: Option<String>,
    },
    /// The model invoked a function
    FunctionCall {
        function_name: String,
        arguments: Value,
    },
    /// A tool finished and produced a result
    ToolResult { tool_name: String, result: Value },
    /// A remote subtask started
    AgentTaskStart {
        task_id: String,
        agent_type: String,
        description: String,
    },
    /// A remote subtask reported progress (0.0..=1.0)
    AgentTaskProgress {
        task_id: String,
        progress: f64,
        status: String,
    },
    /// A remote subtask finished, successfully or not
    AgentTaskComplete {
        task_id: String,
        result: Value,
        success: bool,
    },
    /// Opaque metrics payload
    Metrics(Map<String, Value>),
    /// Error reported by the backend
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        recoverable: bool,
    },
    /// Stream completed
    Done(DoneEvent),
}

/// Terminal payload of a successful stream
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DoneEvent {
    /// Full response text. `None` means "use whatever was accumulated".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
    /// Server-side processing time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Value>>,
}

impl DoneEvent {
    /// A `done` frame that carries no data of its own, as produced by the
    /// `[DONE]` terminator.
    pub fn terminator() -> Self {
        Self::default()
    }

    /// A `done` frame carrying a complete response text.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            final_response: Some(text.into()),
            ..Self::default()
        }
    }
}

impl EventFrame {
    /// Shorthand for an incremental-or-cumulative token frame.
    pub fn token(content: impl Into<String>) -> Self {
        EventFrame::Token {
            content: content.into(),
            delta: None,
        }
    }

    /// Shorthand for a delta-only token frame.
    pub fn delta(delta: impl Into<String>) -> Self {
        EventFrame::Token {
            content: String::new(),
            delta: Some(delta.into()),
        }
    }

    /// Returns the event type name as a string for logging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            EventFrame::StreamStart { .. } => "stream_start",
            EventFrame::Token { .. } => "token",
            EventFrame::FunctionCall { .. } => "function_call",
            EventFrame::ToolResult { .. } => "tool_result",
            EventFrame::AgentTaskStart { .. } => "agent_task_start",
            EventFrame::AgentTaskProgress { .. } => "agent_task_progress",
            EventFrame::AgentTaskComplete { .. } => "agent_task_complete",
            EventFrame::Metrics(_) => "metrics",
            EventFrame::Error { .. } => "error",
            EventFrame::Done(_) => "done",
        }
    }

    /// True for frames that close a session: `done` and unrecoverable `error`.
    pub fn is_terminal(&self) -> bool {
        match self {
            EventFrame::Done(_) => true,
            EventFrame::Error { recoverable, .. } => !recoverable,
            _ => false,
        }
    }

    /// The task id for agent task lifecycle frames.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            EventFrame::AgentTaskStart { task_id, .. }
            | EventFrame::AgentTaskProgress { task_id, .. }
            | EventFrame::AgentTaskComplete { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    /// Serialize to the canonical JSON wire shape.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
