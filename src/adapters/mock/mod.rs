//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with scripted (streaming) responses
//! - [`MockWsConnector`] - WebSocket connector with a scripted peer

pub mod http;
pub mod websocket;

pub use http::{sse_chunks, MockHttpClient, MockResponse, RecordedRequest};
pub use websocket::{MockWsConnector, MockWsEnding};
