//! Terminal event parsers: `done`, legacy full responses and `error`

use serde_json::Value;

use super::{decode, FrameParseError};
use crate::protocol::events::{DoneEvent, EventFrame};
use crate::protocol::payloads::{DonePayload, ErrorPayload};

/// Parse an explicit `done` event
pub(super) fn parse_done_event(event_type: &str, data: &Value) -> Result<EventFrame, FrameParseError> {
    let payload: DonePayload = decode(event_type, data)?;
    Ok(EventFrame::Done(done_from_payload(payload)))
}

/// Normalize an untagged object into a `done` frame.
///
/// Legacy servers reply with `{"response": "...", "conversation_id": ...}`
/// or, over WebSocket, `{"response": "...", "done": true}`. Returns `None`
/// when the object has neither a string `response` nor `done: true`.
pub(super) fn parse_legacy_response(data: &Value) -> Result<Option<EventFrame>, FrameParseError> {
    let has_response = data.get("response").map(Value::is_string).unwrap_or(false);
    let done_flag = data.get("done").and_then(Value::as_bool).unwrap_or(false);
    if !has_response && !done_flag {
        return Ok(None);
    }

    let payload: DonePayload = decode("done", data)?;
    Ok(Some(EventFrame::Done(done_from_payload(payload))))
}

/// Parse an `error` event
pub(super) fn parse_error_event(event_type: &str, data: &Value) -> Result<EventFrame, FrameParseError> {
    let payload: ErrorPayload = decode(event_type, data)?;
    Ok(EventFrame::Error {
        message: payload
            .message
            .unwrap_or_else(|| "Unknown backend error".to_string()),
        code: payload.code,
        recoverable: payload.recoverable,
    })
}

fn done_from_payload(payload: DonePayload) -> DoneEvent {
    DoneEvent {
        final_response: payload.final_response.or(payload.response),
        conversation_id: payload.conversation_id,
        agent_type: payload.agent_type,
        processing_time: payload.processing_time,
        token_usage: payload.token_usage,
        sources: payload.sources,
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::events::{DoneEvent, EventFrame};
    use crate::protocol::parser::{parse_frame, FrameParser};
    use serde_json::json;

    #[test]
    fn test_parse_explicit_done() {
        let frame = parse_frame(
            None,
            r#"{"type": "done", "finalResponse": "Hi!", "conversationId": "c1", "agentType": "general", "processingTime": 1.5, "tokenUsage": {"total": 12}, "sources": ["a"]}"#,
        )
        .unwrap();
        assert_eq!(
            frame,
            Some(EventFrame::Done(DoneEvent {
                final_response: Some("Hi!".to_string()),
                conversation_id: Some("c1".to_string()),
                agent_type: Some("general".to_string()),
                processing_time: Some(1.5),
                token_usage: Some(json!({"total": 12})),
                sources: Some(vec![json!("a")]),
            }))
        );
    }

    #[test]
    fn test_legacy_response_matches_explicit_done() {
        let legacy = parse_frame(None, r#"{"response": "Long text", "conversation_id": "c1"}"#)
            .unwrap();
        let explicit = parse_frame(
            None,
            r#"{"type": "done", "final_response": "Long text", "conversation_id": "c1"}"#,
        )
        .unwrap();
        assert_eq!(legacy, explicit);
    }

    #[test]
    fn test_websocket_legacy_done_flag() {
        let frame = parse_frame(None, r#"{"response": "ws reply", "done": true}"#).unwrap();
        assert_eq!(frame, Some(EventFrame::Done(DoneEvent::with_response("ws reply"))));
    }

    #[test]
    fn test_bare_done_flag_uses_accumulated_text() {
        let frame = parse_frame(None, r#"{"done": true}"#).unwrap();
        assert_eq!(frame, Some(EventFrame::Done(DoneEvent::terminator())));
    }

    #[test]
    fn test_done_terminator_line() {
        let mut parser = FrameParser::new();
        assert_eq!(
            parser.parse("data: [DONE]"),
            Some(EventFrame::Done(DoneEvent::terminator()))
        );
    }

    #[test]
    fn test_parse_error_event() {
        let frame = parse_frame(
            None,
            r#"{"type": "error", "message": "quota exceeded", "code": "E429", "recoverable": true}"#,
        )
        .unwrap();
        assert_eq!(
            frame,
            Some(EventFrame::Error {
                message: "quota exceeded".to_string(),
                code: Some("E429".to_string()),
                recoverable: true,
            })
        );
    }

    #[test]
    fn test_error_defaults_to_fatal() {
        let frame = parse_frame(None, r#"{"type": "error", "error": "crashed"}"#).unwrap();
        assert_eq!(
            frame,
            Some(EventFrame::Error {
                message: "crashed".to_string(),
                code: None,
                recoverable: false,
            })
        );
    }
}
