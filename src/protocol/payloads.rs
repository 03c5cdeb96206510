//! Frame payload deserialization structs
//!
//! Internal structs used to deserialize JSON payloads. Backends disagree on
//! casing, so every multi-word field accepts both `snake_case` and
//! `camelCase`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `stream_start` payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StreamStartPayload {
    #[serde(default, alias = "conversationId")]
    pub conversation_id: Option<String>,
}

/// `token` payload. Some backends send `text` instead of `content`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenPayload {
    #[serde(default, alias = "text")]
    pub content: Option<String>,
    #[serde(default)]
    pub delta: Option<String>,
}

/// `function_call` payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FunctionCallPayload {
    #[serde(alias = "functionName", alias = "name")]
    pub function_name: String,
    #[serde(default, alias = "args")]
    pub arguments: Value,
}

/// `tool_result` payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ToolResultPayload {
    #[serde(alias = "toolName", alias = "name")]
    pub tool_name: String,
    #[serde(default)]
    pub result: Value,
}

/// `agent_task_start` payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AgentTaskStartPayload {
    #[serde(alias = "taskId")]
    pub task_id: String,
    #[serde(default, alias = "agentType")]
    pub agent_type: String,
    #[serde(default)]
    pub description: String,
}

/// `agent_task_progress` payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AgentTaskProgressPayload {
    #[serde(alias = "taskId")]
    pub task_id: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub status: String,
}

/// `agent_task_complete` payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AgentTaskCompletePayload {
    #[serde(alias = "taskId")]
    pub task_id: String,
    #[serde(default)]
    pub result: Value,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

/// `error` payload. `code` may be a string or a number on the wire.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: Option<String>,
    #[serde(default)]
    pub recoverable: bool,
}

/// `done` payload, including the legacy untagged `{response, ...}` shape
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DonePayload {
    #[serde(default, alias = "finalResponse")]
    pub final_response: Option<String>,
    /// Legacy servers put the full text here
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default, alias = "conversationId")]
    pub conversation_id: Option<String>,
    #[serde(default, alias = "agentType", alias = "agent_used")]
    pub agent_type: Option<String>,
    #[serde(default, alias = "processingTime")]
    pub processing_time: Option<f64>,
    #[serde(default, alias = "tokenUsage")]
    pub token_usage: Option<Value>,
    #[serde(default)]
    pub sources: Option<Vec<Value>>,
}

fn code_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
