use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::protocol::DoneEvent;
use crate::transport::TransportMode;

/// Agent type reported on synthesized fallback responses
pub const FALLBACK_AGENT_TYPE: &str = "fallback";

/// Metadata attached to a terminal chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// True when the response was synthesized instead of received
    #[serde(default)]
    pub fallback_used: bool,
    /// Why the fallback was used ("timeout", "connection_closed", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// True when the response only holds text received before a failure
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
    /// Transport that delivered the response, if streamed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Value>>,
    /// When the response was finalized on this side
    #[serde(default = "Utc::now")]
    pub completed_at: DateTime<Utc>,
    /// Anything else the backend sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ResponseMetadata {
    fn default() -> Self {
        Self {
            fallback_used: false,
            fallback_reason: None,
            partial: false,
            transport: None,
            processing_time: None,
            token_usage: None,
            sources: None,
            completed_at: Utc::now(),
            extra: Map::new(),
        }
    }
}

/// Terminal aggregate of one chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Full response text
    pub response: String,
    #[serde(default, alias = "conversationId")]
    pub conversation_id: String,
    #[serde(default = "default_agent_type", alias = "agentType", alias = "agent_used")]
    pub agent_type: String,
    #[serde(default)]
    pub metadata: ResponseMetadata,
}

fn default_agent_type() -> String {
    "general".to_string()
}

impl ChatResponse {
    /// Build the response for a `done` frame.
    ///
    /// `accumulated` is used when the frame carries no text of its own, and
    /// `conversation_id` when it carries no conversation id.
    pub fn from_done(
        done: DoneEvent,
        accumulated: &str,
        conversation_id: &str,
        transport: Option<TransportMode>,
    ) -> Self {
        Self {
            response: done.final_response.unwrap_or_else(|| accumulated.to_string()),
            conversation_id: done
                .conversation_id
                .unwrap_or_else(|| conversation_id.to_string()),
            agent_type: done.agent_type.unwrap_or_else(default_agent_type),
            metadata: ResponseMetadata {
                transport,
                processing_time: done.processing_time,
                token_usage: done.token_usage,
                sources: done.sources,
                ..ResponseMetadata::default()
            },
        }
    }

    /// True when this response was synthesized by the fallback policy
    pub fn is_fallback(&self) -> bool {
        self.metadata.fallback_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_done_prefers_final_response() {
        let done = DoneEvent {
            final_response: Some("final".to_string()),
            conversation_id: Some("c2".to_string()),
            agent_type: Some("research".to_string()),
            processing_time: Some(0.8),
            ..DoneEvent::default()
        };
        let response = ChatResponse::from_done(done, "accumulated", "c1", Some(TransportMode::Sse));
        assert_eq!(response.response, "final");
        assert_eq!(response.conversation_id, "c2");
        assert_eq!(response.agent_type, "research");
        assert_eq!(response.metadata.processing_time, Some(0.8));
        assert_eq!(response.metadata.transport, Some(TransportMode::Sse));
        assert!(!response.is_fallback());
    }

    #[test]
    fn test_from_done_falls_back_to_accumulated() {
        let response = ChatResponse::from_done(DoneEvent::terminator(), "Hello there", "c1", None);
        assert_eq!(response.response, "Hello there");
        assert_eq!(response.conversation_id, "c1");
        assert_eq!(response.agent_type, "general");
    }

    #[test]
    fn test_deserialize_single_shot_body() {
        let response: ChatResponse = serde_json::from_value(json!({
            "response": "Hi",
            "conversation_id": "c7",
            "agent_used": "code",
            "metadata": {"processing_time": 0.2, "model": "m1"}
        }))
        .unwrap();
        assert_eq!(response.agent_type, "code");
        assert_eq!(response.metadata.processing_time, Some(0.2));
        assert_eq!(response.metadata.extra.get("model"), Some(&json!("m1")));
        assert!(!response.metadata.fallback_used);
    }

    #[test]
    fn test_metadata_serializes_fallback_flag() {
        let metadata = ResponseMetadata {
            fallback_used: true,
            fallback_reason: Some("timeout".to_string()),
            ..ResponseMetadata::default()
        };
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["fallback_used"], json!(true));
        assert_eq!(value["fallback_reason"], json!("timeout"));
        assert!(value.get("partial").is_none());
    }
}
