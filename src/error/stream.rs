//! Streaming-related error types.
//!
//! The taxonomy of everything that can end, or be skipped within, a stream
//! session. Only `FatalProtocol`, `Transport` without content and
//! `TransportOpen` ever reach a caller's `on_error`; the rest are resolved by
//! the session and its fallback policy.

use thiserror::Error;

use crate::transport::TransportMode;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// The session deadline expired. Resolved as a fallback response.
    #[error("Stream timed out after {duration_ms} ms")]
    Timeout { duration_ms: u64 },

    /// The caller cancelled the session. Never reported through callbacks.
    #[error("Stream cancelled by caller")]
    Cancelled,

    /// A transport could not be established.
    #[error("Failed to open {mode} transport: {message}")]
    TransportOpen { mode: TransportMode, message: String },

    /// The transport failed while streaming.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The peer closed the stream before a terminal frame arrived.
    #[error("Stream closed before completion{}", reason.as_ref().map(|r| format!(": {}", r)).unwrap_or_default())]
    ConnectionClosed { reason: Option<String> },

    /// A single frame could not be decoded. Logged and skipped.
    #[error("Failed to parse frame: {message}")]
    Parse { message: String },

    /// The backend reported an error it can recover from.
    #[error("Recoverable backend error{}: {message}", code.as_ref().map(|c| format!(" [{}]", c)).unwrap_or_default())]
    RecoverableProtocol { code: Option<String>, message: String },

    /// The backend reported an error that ends the stream.
    #[error("Backend error{}: {message}", code.as_ref().map(|c| format!(" [{}]", c)).unwrap_or_default())]
    FatalProtocol { code: Option<String>, message: String },

    /// `send` was called on a session that already ran.
    #[error("Stream session has already been used")]
    SessionReused,
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::Timeout { .. }
                | StreamError::TransportOpen { .. }
                | StreamError::Transport { .. }
                | StreamError::ConnectionClosed { .. }
        )
    }

    /// True for errors that end in a fallback response instead of `on_error`.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StreamError::Timeout { .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Timeout { .. } => {
                "The assistant is taking too long to respond.".to_string()
            }
            StreamError::Cancelled => "The request was cancelled.".to_string(),
            StreamError::TransportOpen { .. } => {
                "Unable to reach the chat service. Please check your connection.".to_string()
            }
            StreamError::Transport { .. } | StreamError::ConnectionClosed { .. } => {
                "The connection to the chat service was interrupted.".to_string()
            }
            StreamError::Parse { .. } => {
                "Received invalid data from server. Please try again.".to_string()
            }
            StreamError::RecoverableProtocol { message, .. }
            | StreamError::FatalProtocol { message, .. } => {
                format!("Server error: {}", message)
            }
            StreamError::SessionReused => {
                "This request has already been sent. Start a new session.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Timeout { .. } => "E_STREAM_TIMEOUT",
            StreamError::Cancelled => "E_STREAM_CANCEL",
            StreamError::TransportOpen { .. } => "E_STREAM_OPEN",
            StreamError::Transport { .. } => "E_STREAM_TRANSPORT",
            StreamError::ConnectionClosed { .. } => "E_STREAM_CLOSED",
            StreamError::Parse { .. } => "E_STREAM_PARSE",
            StreamError::RecoverableProtocol { .. } => "E_STREAM_RECOVERABLE",
            StreamError::FatalProtocol { .. } => "E_STREAM_BACKEND",
            StreamError::SessionReused => "E_STREAM_REUSED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_retryable() {
        let err = StreamError::Timeout { duration_ms: 30_000 };
        assert!(err.is_retryable());
        assert!(err.is_timeout());
        assert_eq!(err.error_code(), "E_STREAM_TIMEOUT");
        assert_eq!(err.to_string(), "Stream timed out after 30000 ms");
    }

    #[test]
    fn test_transport_open_display_names_mode() {
        let err = StreamError::TransportOpen {
            mode: TransportMode::WebSocket,
            message: "refused".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to open websocket transport: refused");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_fatal_protocol_display() {
        let err = StreamError::FatalProtocol {
            code: Some("E001".to_string()),
            message: "model crashed".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error [E001]: model crashed");
        assert!(!err.is_retryable());
        assert!(err.user_message().contains("model crashed"));

        let err = StreamError::FatalProtocol {
            code: None,
            message: "model crashed".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error: model crashed");
    }

    #[test]
    fn test_connection_closed_display() {
        assert_eq!(
            StreamError::ConnectionClosed { reason: None }.to_string(),
            "Stream closed before completion"
        );
        assert_eq!(
            StreamError::ConnectionClosed {
                reason: Some("going away".to_string())
            }
            .to_string(),
            "Stream closed before completion: going away"
        );
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!StreamError::Cancelled.is_retryable());
        assert!(!StreamError::SessionReused.is_retryable());
        assert!(!StreamError::Parse {
            message: "eof".to_string()
        }
        .is_retryable());
    }
}
