use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Agent the backend should route the message to instead of choosing itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentOverride {
    General,
    Research,
    Code,
    Data,
    Creative,
}

impl AgentOverride {
    /// Wire name of the agent
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentOverride::General => "general",
            AgentOverride::Research => "research",
            AgentOverride::Code => "code",
            AgentOverride::Data => "data",
            AgentOverride::Creative => "creative",
        }
    }
}

impl fmt::Display for AgentOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(AgentOverride::General),
            "research" => Ok(AgentOverride::Research),
            "code" => Ok(AgentOverride::Code),
            "data" => Ok(AgentOverride::Data),
            "creative" => Ok(AgentOverride::Creative),
            other => Err(format!("unknown agent '{}'", other)),
        }
    }
}

/// Request structure for chat calls, streaming or single-shot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamRequest {
    /// The user message to send
    pub message: String,
    /// Conversation to continue - None starts a new one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Force a specific agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_override: Option<AgentOverride>,
    /// Free-form context forwarded to the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl StreamRequest {
    /// Create a new StreamRequest for a new conversation
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: None,
            agent_override: None,
            context: None,
        }
    }

    /// Continue an existing conversation (builder pattern)
    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Route to a specific agent (builder pattern)
    pub fn with_agent_override(mut self, agent: AgentOverride) -> Self {
        self.agent_override = Some(agent);
        self
    }

    /// Add one context entry (builder pattern)
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Query parameters for the SSE endpoint. Context is sent as a JSON string.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("message", self.message.clone())];
        if let Some(ref id) = self.conversation_id {
            params.push(("conversation_id", id.clone()));
        }
        if let Some(agent) = self.agent_override {
            params.push(("agent_override", agent.as_str().to_string()));
        }
        if let Some(ref context) = self.context {
            params.push(("context", Value::Object(context.clone()).to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_request_new() {
        let request = StreamRequest::new("Hello");
        assert_eq!(request.message, "Hello");
        assert!(request.conversation_id.is_none());
        assert!(request.agent_override.is_none());
        assert!(request.context.is_none());
    }

    #[test]
    fn test_stream_request_serialization_skips_none() {
        let request = StreamRequest::new("Hi");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"message": "Hi"}));
    }

    #[test]
    fn test_stream_request_builder() {
        let request = StreamRequest::new("Hi")
            .with_conversation("c1")
            .with_agent_override(AgentOverride::Research)
            .with_context("locale", json!("en-US"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "Hi",
                "conversation_id": "c1",
                "agent_override": "research",
                "context": {"locale": "en-US"}
            })
        );
    }

    #[test]
    fn test_query_params_order_and_encoding_inputs() {
        let params = StreamRequest::new("What is Rust?")
            .with_conversation("c9")
            .with_context("page", json!(2))
            .query_params();
        assert_eq!(
            params,
            vec![
                ("message", "What is Rust?".to_string()),
                ("conversation_id", "c9".to_string()),
                ("context", r#"{"page":2}"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_agent_override_from_str() {
        assert_eq!("Code".parse::<AgentOverride>(), Ok(AgentOverride::Code));
        assert!("wizard".parse::<AgentOverride>().is_err());
        assert_eq!(AgentOverride::Creative.to_string(), "creative");
    }
}
