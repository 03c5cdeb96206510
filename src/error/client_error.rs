//! Unified error type for the chat client.
//!
//! `ClientError` is what the fallible, non-streaming surface returns
//! (single-shot requests, health checks, configuration loading). Streaming
//! sessions never return it; their failures arrive through callbacks.

use thiserror::Error;

use super::category::ErrorCategory;
use super::network::NetworkError;
use super::stream::StreamError;
use crate::websocket::WsError;

/// Unified error type for the chat client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Stream processing errors.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// HTTP-level errors.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// WebSocket channel errors.
    #[error(transparent)]
    WebSocket(#[from] WsError),

    /// Missing or invalid configuration.
    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },

    /// A response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Build a configuration error for `key`.
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Stream(err) => match err {
                StreamError::Timeout { .. }
                | StreamError::TransportOpen { .. }
                | StreamError::Transport { .. }
                | StreamError::ConnectionClosed { .. } => ErrorCategory::Network,
                StreamError::RecoverableProtocol { .. } | StreamError::FatalProtocol { .. } => {
                    ErrorCategory::Server
                }
                StreamError::Parse { .. } => ErrorCategory::Protocol,
                StreamError::Cancelled => ErrorCategory::Cancelled,
                StreamError::SessionReused => ErrorCategory::Client,
            },
            ClientError::Network(err) => match err {
                NetworkError::HttpStatus { status, .. } if *status >= 500 => ErrorCategory::Server,
                NetworkError::HttpStatus { .. } => ErrorCategory::Client,
                NetworkError::InvalidResponse { .. } => ErrorCategory::Protocol,
                NetworkError::InvalidUrl(_) => ErrorCategory::Configuration,
                NetworkError::Cancelled => ErrorCategory::Cancelled,
                _ => ErrorCategory::Network,
            },
            ClientError::WebSocket(WsError::Protocol(_)) => ErrorCategory::Protocol,
            ClientError::WebSocket(_) => ErrorCategory::Network,
            ClientError::Config { .. } => ErrorCategory::Configuration,
            ClientError::Json(_) => ErrorCategory::Protocol,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Stream(err) => err.is_retryable(),
            ClientError::Network(err) => err.is_retryable(),
            ClientError::WebSocket(err) => err.is_retryable(),
            ClientError::Config { .. } | ClientError::Json(_) => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Stream(err) => err.user_message(),
            ClientError::Network(err) => err.user_message(),
            ClientError::WebSocket(_) => {
                "The live connection to the chat service failed.".to_string()
            }
            ClientError::Config { key, .. } => format!("Check the value of {}.", key),
            ClientError::Json(_) => "Received an invalid response from the server.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Stream(err) => err.error_code(),
            ClientError::Network(err) => err.error_code(),
            ClientError::WebSocket(_) => "E_WS",
            ClientError::Config { .. } => "E_CONFIG",
            ClientError::Json(_) => "E_JSON",
        }
    }

    /// Returns suggested recovery actions.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_error_categories() {
        let timeout: ClientError = StreamError::Timeout { duration_ms: 10 }.into();
        assert_eq!(timeout.category(), ErrorCategory::Network);
        assert!(timeout.is_retryable());

        let fatal: ClientError = StreamError::FatalProtocol {
            code: None,
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(fatal.category(), ErrorCategory::Server);
        assert_eq!(fatal.error_code(), "E_STREAM_BACKEND");

        let reused: ClientError = StreamError::SessionReused.into();
        assert_eq!(reused.category(), ErrorCategory::Client);
    }

    #[test]
    fn test_network_error_categories() {
        let err: ClientError = NetworkError::HttpStatus {
            status: 502,
            message: "bad gateway".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.is_retryable());

        let err: ClientError = NetworkError::HttpStatus {
            status: 404,
            message: "missing".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Client);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_config_error() {
        let err = ClientError::config("CHATSTREAM_TIMEOUT_SECS", "not a number");
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Invalid configuration for CHATSTREAM_TIMEOUT_SECS: not a number"
        );
        assert!(err.user_message().contains("CHATSTREAM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_transparent_display() {
        let err: ClientError = StreamError::Cancelled.into();
        assert_eq!(err.to_string(), "Stream cancelled by caller");
        assert_eq!(err.category(), ErrorCategory::Cancelled);
    }

    #[test]
    fn test_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ClientError = json_err.into();
        assert_eq!(err.category(), ErrorCategory::Protocol);
        assert_eq!(err.error_code(), "E_JSON");
    }
}
