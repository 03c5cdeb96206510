//! Content event parsers: tokens, function calls and tool results

use serde_json::Value;

use super::{decode, FrameParseError};
use crate::protocol::events::EventFrame;
use crate::protocol::payloads::{FunctionCallPayload, ToolResultPayload, TokenPayload};

/// Parse a `token` event
pub(super) fn parse_token_event(event_type: &str, data: &Value) -> Result<EventFrame, FrameParseError> {
    let payload: TokenPayload = decode(event_type, data)?;
    Ok(EventFrame::Token {
        content: payload.content.unwrap_or_default(),
        delta: payload.delta,
    })
}

/// Parse a `function_call` event
pub(super) fn parse_function_call_event(
    event_type: &str,
    data: &Value,
) -> Result<EventFrame, FrameParseError> {
    let payload: FunctionCallPayload = decode(event_type, data)?;
    Ok(EventFrame::FunctionCall {
        function_name: payload.function_name,
        arguments: payload.arguments,
    })
}

/// Parse a `tool_result` event
pub(super) fn parse_tool_result_event(
    event_type: &str,
    data: &Value,
) -> Result<EventFrame, FrameParseError> {
    let payload: ToolResultPayload = decode(event_type, data)?;
    Ok(EventFrame::ToolResult {
        tool_name: payload.tool_name,
        result: payload.result,
    })
}

#[cfg(test)]
mod tests {
    use crate::protocol::events::EventFrame;
    use crate::protocol::parser::parse_frame;
    use serde_json::json;

    #[test]
    fn test_parse_token_with_content() {
        let frame = parse_frame(None, r#"{"type": "token", "content": "Hello"}"#).unwrap();
        assert_eq!(frame, Some(EventFrame::token("Hello")));
    }

    #[test]
    fn test_parse_token_with_delta_only() {
        let frame = parse_frame(None, r#"{"type": "token", "delta": " world"}"#).unwrap();
        assert_eq!(frame, Some(EventFrame::delta(" world")));
    }

    #[test]
    fn test_parse_token_text_alias() {
        let frame = parse_frame(Some("token"), r#"{"text": "hi"}"#).unwrap();
        assert_eq!(frame, Some(EventFrame::token("hi")));
    }

    #[test]
    fn test_parse_function_call() {
        let frame = parse_frame(
            None,
            r#"{"type": "function_call", "functionName": "search", "arguments": {"q": "rust"}}"#,
        )
        .unwrap();
        assert_eq!(
            frame,
            Some(EventFrame::FunctionCall {
                function_name: "search".to_string(),
                arguments: json!({"q": "rust"}),
            })
        );
    }

    #[test]
    fn test_parse_tool_result() {
        let frame = parse_frame(
            None,
            r#"{"type": "tool_result", "tool_name": "search", "result": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(
            frame,
            Some(EventFrame::ToolResult {
                tool_name: "search".to_string(),
                result: json!(["a", "b"]),
            })
        );
    }

    #[test]
    fn test_function_call_missing_name_is_error() {
        assert!(parse_frame(None, r#"{"type": "function_call", "arguments": {}}"#).is_err());
    }
}
