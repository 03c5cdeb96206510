//! Fallback policy for failed or stalled sessions.
//!
//! A slow or vanished backend produces a low-confidence answer through
//! `on_complete`. Only failures that leave nothing to show (the transport
//! never opened, it broke before any text, or the backend sent a fatal
//! `error` frame) reach `on_error`. Cancellation produces nothing.

use tracing::{info, warn};

use crate::error::StreamError;
use crate::models::{ChatResponse, ResponseMetadata, FALLBACK_AGENT_TYPE};
use crate::transport::TransportMode;

/// Default text of a synthesized response
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "I'm having trouble responding right now. Please try again in a moment.";

/// `metadata.fallback_reason` values
pub const FALLBACK_REASON_TIMEOUT: &str = "timeout";
pub const FALLBACK_REASON_CONNECTION_CLOSED: &str = "connection_closed";
pub const FALLBACK_REASON_TRANSPORT_ERROR: &str = "transport_error";

/// What the session should do with a failure
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackDecision {
    /// Deliver this response through `on_complete`
    Degrade(ChatResponse),
    /// Deliver this error through `on_error`
    Fail(StreamError),
    /// Deliver nothing
    Silent,
}

/// Decides between degrading, failing and staying silent.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPolicy {
    /// Text used when nothing was received
    pub message: String,
    /// `agent_type` of synthesized responses
    pub agent_type: String,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            agent_type: FALLBACK_AGENT_TYPE.to_string(),
        }
    }
}

impl FallbackPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `message` for responses synthesized from nothing (builder pattern)
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Resolve `error` given the text received so far.
    pub fn decide(
        &self,
        error: StreamError,
        partial: &str,
        conversation_id: &str,
        transport: Option<TransportMode>,
    ) -> FallbackDecision {
        match error {
            StreamError::Cancelled => FallbackDecision::Silent,
            StreamError::Timeout { duration_ms } => {
                info!(duration_ms, "Session timed out, degrading to fallback response");
                FallbackDecision::Degrade(self.synthesize(
                    FALLBACK_REASON_TIMEOUT,
                    partial,
                    conversation_id,
                    transport,
                ))
            }
            StreamError::ConnectionClosed { ref reason } => {
                info!(
                    reason = reason.as_deref().unwrap_or("none"),
                    "Stream closed early, degrading to fallback response"
                );
                FallbackDecision::Degrade(self.synthesize(
                    FALLBACK_REASON_CONNECTION_CLOSED,
                    partial,
                    conversation_id,
                    transport,
                ))
            }
            StreamError::Transport { ref message } if !partial.is_empty() => {
                warn!("Transport failed after partial content: {}", message);
                FallbackDecision::Degrade(self.synthesize(
                    FALLBACK_REASON_TRANSPORT_ERROR,
                    partial,
                    conversation_id,
                    transport,
                ))
            }
            other => FallbackDecision::Fail(other),
        }
    }

    /// Build a fallback response. Partial text wins over the default message.
    pub fn synthesize(
        &self,
        reason: &str,
        partial: &str,
        conversation_id: &str,
        transport: Option<TransportMode>,
    ) -> ChatResponse {
        let has_partial = !partial.is_empty();
        ChatResponse {
            response: if has_partial {
                partial.to_string()
            } else {
                self.message.clone()
            },
            conversation_id: conversation_id.to_string(),
            agent_type: self.agent_type.clone(),
            metadata: ResponseMetadata {
                fallback_used: true,
                fallback_reason: Some(reason.to_string()),
                partial: has_partial,
                transport,
                ..ResponseMetadata::default()
            },
        }
    }
}
