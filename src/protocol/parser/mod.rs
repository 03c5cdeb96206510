//! Frame parsing logic
//!
//! `FrameParser` turns raw transport text into `EventFrame` values. It accepts
//! both SSE lines (`event:`, `data:`, comments, blank separators) and bare
//! WebSocket JSON messages through the same `parse` entry point.
//!
//! Parsing never fails the stream: malformed input is logged and dropped.

mod agent;
mod content;
mod misc;
mod terminal;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::protocol::events::{DoneEvent, EventFrame};

use agent::{
    parse_agent_task_complete_event, parse_agent_task_progress_event,
    parse_agent_task_start_event,
};
use content::{parse_function_call_event, parse_token_event, parse_tool_result_event};
use misc::{parse_metrics_event, parse_stream_start_event};
use terminal::{parse_done_event, parse_error_event, parse_legacy_response};

/// SSE convention for "stream finished"
pub const DONE_TERMINATOR: &str = "[DONE]";

/// Errors that can occur while decoding a single frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameParseError {
    /// The frame body was not valid JSON
    #[error("Invalid JSON frame: {reason}")]
    InvalidJson { reason: String },

    /// The frame was valid JSON but not an object
    #[error("Frame is not a JSON object: {raw}")]
    NotAnObject { raw: String },

    /// The object did not match the payload shape for its tag
    #[error("Invalid payload for '{event_type}' event: {message}")]
    InvalidPayload { event_type: String, message: String },
}

/// Represents a classified SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: token")
    Event(String),
    /// Data payload (e.g., "data: {\"type\": \"token\"}")
    Data(String),
    /// Empty line - signals end of event
    Empty,
    /// Comment line (starts with ':'), including heartbeats
    Comment(String),
    /// `id:` / `retry:` fields, which carry nothing for this protocol
    Field(String),
    /// Anything else; WebSocket messages land here
    Raw(String),
}

/// Classify a single line of transport text
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim().is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    if line.starts_with("id:") || line.starts_with("retry:") {
        return SseLine::Field(line.to_string());
    }

    SseLine::Raw(line.trim().to_string())
}

/// Decode a JSON frame body into an `EventFrame`.
///
/// `tag_hint` is the SSE `event:` name, used when the object has neither a
/// `type` nor an `event` field. Returns `Ok(None)` for heartbeats, unknown
/// tags and untagged objects that are not legacy responses.
pub fn parse_frame(tag_hint: Option<&str>, data: &str) -> Result<Option<EventFrame>, FrameParseError> {
    let json: Value = serde_json::from_str(data).map_err(|e| FrameParseError::InvalidJson {
        reason: e.to_string(),
    })?;

    if !json.is_object() {
        return Err(FrameParseError::NotAnObject {
            raw: truncate(data, 80),
        });
    }

    let tag = json
        .get("type")
        .and_then(Value::as_str)
        .or_else(|| json.get("event").and_then(Value::as_str))
        .or(tag_hint);

    let Some(tag) = tag else {
        return parse_legacy_response(&json);
    };

    // Some backends nest the payload under "data"
    let payload = json
        .get("data")
        .filter(|d| d.is_object())
        .unwrap_or(&json);

    let frame = match tag {
        "stream_start" => parse_stream_start_event(tag, payload)?,
        "token" | "content" | "chunk" => parse_token_event(tag, payload)?,
        "function_call" => parse_function_call_event(tag, payload)?,
        "tool_result" => parse_tool_result_event(tag, payload)?,
        "agent_task_start" => parse_agent_task_start_event(tag, payload)?,
        "agent_task_progress" => parse_agent_task_progress_event(tag, payload)?,
        "agent_task_complete" => parse_agent_task_complete_event(tag, payload)?,
        "metrics" => parse_metrics_event(payload),
        "error" => parse_error_event(tag, payload)?,
        "done" => parse_done_event(tag, payload)?,
        "ping" | "heartbeat" => return Ok(None),
        other => {
            debug!(event_type = other, "Ignoring unknown event type");
            return Ok(None);
        }
    };

    Ok(Some(frame))
}

/// Stateful frame parser.
///
/// Tracks the pending SSE `event:` name until the blank line that ends the
/// event. Each `data:` line is decoded on its own, since the backend sends one
/// complete JSON document per line.
#[derive(Debug, Default)]
pub struct FrameParser {
    pending_event: Option<String>,
    skipped: u64,
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line (SSE) or one message (WebSocket).
    ///
    /// Returns `None` for blank lines, comments, unknown tags and anything
    /// that fails to decode. A `[DONE]` terminator becomes an empty `done`
    /// frame; the session fills in the accumulated text.
    pub fn parse(&mut self, raw: &str) -> Option<EventFrame> {
        match parse_sse_line(raw) {
            SseLine::Empty => {
                self.pending_event = None;
                None
            }
            SseLine::Comment(_) | SseLine::Field(_) => None,
            SseLine::Event(name) => {
                self.pending_event = Some(name);
                None
            }
            SseLine::Data(data) => self.decode(&data),
            SseLine::Raw(text) => self.decode(&text),
        }
    }

    /// Number of frames dropped because they failed to decode
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.pending_event = None;
    }

    fn decode(&mut self, data: &str) -> Option<EventFrame> {
        if data.is_empty() {
            return None;
        }
        if data == DONE_TERMINATOR {
            return Some(EventFrame::Done(DoneEvent::terminator()));
        }

        match parse_frame(self.pending_event.as_deref(), data) {
            Ok(frame) => frame,
            Err(e) => {
                self.skipped += 1;
                warn!(error = %e, raw = %truncate(data, 120), "Skipping malformed frame");
                None
            }
        }
    }
}

/// Deserialize a payload, mapping failures to `InvalidPayload`
pub(super) fn decode<T: DeserializeOwned>(event_type: &str, data: &Value) -> Result<T, FrameParseError> {
    T::deserialize(data).map_err(|e| FrameParseError::InvalidPayload {
        event_type: event_type.to_string(),
        message: e.to_string(),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
