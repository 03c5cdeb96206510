use chatstream::models::{AgentOverride, StreamRequest};
use chatstream::protocol::{EventFrame, FrameParser};
use chatstream::websocket::{WsAuth, WsChat, WsOutgoingMessage};

#[test]
fn test_serialize_auth_frame() {
    let msg = WsOutgoingMessage::Auth(WsAuth::new(Some("key-123".to_string())));

    let json = serde_json::to_string(&msg).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["type"], "auth");
    assert_eq!(parsed["api_key"], "key-123");
}

#[test]
fn test_serialize_auth_frame_without_key() {
    let msg = WsOutgoingMessage::Auth(WsAuth::new(None));
    let parsed: serde_json::Value = serde_json::to_value(&msg).unwrap();

    assert_eq!(parsed["type"], "auth");
    assert!(parsed["api_key"].is_null());
}

#[test]
fn test_serialize_chat_frame_from_request() {
    let request = StreamRequest::new("Summarize this")
        .with_conversation("conv-1")
        .with_agent_override(AgentOverride::Creative)
        .with_context("doc_id", serde_json::json!(42));

    let parsed = serde_json::to_value(WsOutgoingMessage::Chat(WsChat::from(&request))).unwrap();

    assert_eq!(parsed["type"], "chat");
    assert_eq!(parsed["message"], "Summarize this");
    assert_eq!(parsed["conversation_id"], "conv-1");
    assert_eq!(parsed["context"]["doc_id"], 42);
}

#[test]
fn test_serialize_chat_frame_omits_missing_fields() {
    let parsed =
        serde_json::to_value(WsChat::from(&StreamRequest::new("Hi"))).unwrap();

    let object = parsed.as_object().unwrap();
    assert!(!object.contains_key("conversation_id"));
    assert!(!object.contains_key("context"));
}

#[test]
fn test_inbound_ws_frames_share_the_sse_parser() {
    let mut parser = FrameParser::new();

    let token = parser.parse(r#"{"type":"token","content":"Hi"}"#);
    assert_eq!(token, Some(EventFrame::token("Hi")));

    let done = parser.parse(r#"{"response":"Hi there","done":true}"#);
    match done {
        Some(EventFrame::Done(done)) => {
            assert_eq!(done.final_response.as_deref(), Some("Hi there"));
        }
        other => panic!("expected done frame, got {:?}", other),
    }

    assert_eq!(parser.parse("not json at all"), None);
    assert_eq!(parser.skipped(), 1);
}
