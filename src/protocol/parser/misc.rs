//! Miscellaneous event parsers: stream start and metrics

use serde_json::{Map, Value};

use super::{decode, FrameParseError};
use crate::protocol::events::EventFrame;
use crate::protocol::payloads::StreamStartPayload;

/// Parse `stream_start`
pub(super) fn parse_stream_start_event(
    event_type: &str,
    data: &Value,
) -> Result<EventFrame, FrameParseError> {
    let payload: StreamStartPayload = decode(event_type, data)?;
    Ok(EventFrame::StreamStart {
        conversation_id: payload.conversation_id.unwrap_or_default(),
    })
}

/// Parse `metrics`. The payload is opaque; only the tag keys are stripped.
pub(super) fn parse_metrics_event(data: &Value) -> EventFrame {
    let mut map: Map<String, Value> = data.as_object().cloned().unwrap_or_default();
    map.remove("type");
    map.remove("event");
    EventFrame::Metrics(map)
}
