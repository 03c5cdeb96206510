//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, streaming GET)
//! - [`WebSocketConnector`] - WebSocket connection establishment

pub mod http;
pub mod websocket;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use websocket::WebSocketConnector;
