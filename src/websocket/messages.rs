use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::StreamRequest;

/// Authentication handshake, always the first frame on a chat socket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WsAuth {
    #[serde(rename = "type")]
    pub type_: String,
    /// Missing keys are sent as `null` so the server can reject explicitly
    pub api_key: Option<String>,
}

impl WsAuth {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            type_: "auth".to_string(),
            api_key,
        }
    }
}

/// Chat payload, sent once after [`WsAuth`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WsChat {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_override: Option<String>,
}

impl From<&StreamRequest> for WsChat {
    fn from(request: &StreamRequest) -> Self {
        Self {
            type_: "chat".to_string(),
            message: request.message.clone(),
            context: request.context.clone(),
            conversation_id: request.conversation_id.clone(),
            agent_override: request.agent_override.map(|agent| agent.as_str().to_string()),
        }
    }
}

/// Outgoing WebSocket messages (sent to server)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WsOutgoingMessage {
    Auth(WsAuth),
    Chat(WsChat),
}

impl WsOutgoingMessage {
    /// Frame type, for logging
    pub fn kind(&self) -> &str {
        match self {
            WsOutgoingMessage::Auth(msg) => &msg.type_,
            WsOutgoingMessage::Chat(msg) => &msg.type_,
        }
    }
}
