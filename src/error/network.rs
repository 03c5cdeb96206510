//! Network-related error types.
//!
//! Errors raised by the HTTP and WebSocket primitives before any frame is
//! involved.

use thiserror::Error;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// Connection to the server failed.
    #[error("Connection failed to '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    /// Request timed out at the HTTP layer.
    #[error("{operation} timed out")]
    Timeout { operation: String },

    /// HTTP status error (non-2xx response).
    #[error("HTTP {status} error: {message}")]
    HttpStatus { status: u16, message: String },

    /// The response had no usable body.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Body stream failed mid-transfer.
    #[error("I/O error: {0}")]
    Io(String),

    /// Request was cancelled.
    #[error("Request cancelled")]
    Cancelled,

    /// Generic network error.
    #[error("Network error: {0}")]
    Other(String),
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::Io(_) => true,
            NetworkError::InvalidResponse { .. }
            | NetworkError::InvalidUrl(_)
            | NetworkError::Cancelled
            | NetworkError::Other(_) => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection.".to_string()
            }
            NetworkError::Timeout { operation } => {
                format!("The {} operation timed out.", operation)
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                401 => "Authentication required. Check your API key.".to_string(),
                403 => "Access denied.".to_string(),
                404 => "The chat endpoint was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            NetworkError::InvalidResponse { .. } => {
                "Received an invalid response from the server.".to_string()
            }
            NetworkError::InvalidUrl(_) => "The server address is invalid.".to_string(),
            NetworkError::Io(_) => "The connection was interrupted.".to_string(),
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other(message) => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::InvalidUrl(_) => "E_NET_URL",
            NetworkError::Io(_) => "E_NET_IO",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other(_) => "E_NET_OTHER",
        }
    }
}

/// Classify a reqwest error into a NetworkError.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> NetworkError {
    if err.is_connect() {
        NetworkError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        NetworkError::Timeout {
            operation: "HTTP request".to_string(),
        }
    } else if err.is_builder() {
        NetworkError::InvalidUrl(err.to_string())
    } else if let Some(status) = err.status() {
        NetworkError::HttpStatus {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else if err.is_decode() {
        NetworkError::InvalidResponse {
            message: format!("Failed to decode response: {}", err),
        }
    } else if err.is_body() {
        NetworkError::Io(err.to_string())
    } else {
        NetworkError::Other(err.to_string())
    }
}
