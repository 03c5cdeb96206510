//! Chat event protocol
//!
//! Parses the wire format shared by the SSE and WebSocket transports.
//! SSE bodies consist of:
//! - `event: <type>` - optional event type line
//! - `data: <json>` - one JSON frame per line, or the literal `[DONE]`
//! - Empty line - ends the event
//! - Lines starting with `:` - comments / heartbeats (ignored)
//!
//! WebSocket messages are the bare JSON frames.
//!
//! # Module structure
//! - `events` - Event type definitions (`EventFrame`, `DoneEvent`)
//! - `payloads` - Internal payload deserialization structs
//! - `parser` - Parsing logic (`FrameParser`, `parse_frame`, `parse_sse_line`)

mod events;
mod parser;
mod payloads;

pub use events::{DoneEvent, EventFrame};
pub use parser::{parse_frame, parse_sse_line, FrameParseError, FrameParser, SseLine, DONE_TERMINATOR};
