//! Common test utilities for integration tests.
//!
//! This module provides reusable fixtures: scripted transports, a recording
//! observer and session builders.
//!
//! # Example
//!
//! ```ignore
//! use common::{sse_session, RecordingObserver};
//!
//! let mut session = sse_session(&[r#"{"type":"token","content":"Hi"}"#, "[DONE]"]);
//! let mut observer = RecordingObserver::default();
//! session.send(StreamRequest::new("hello"), &mut observer).await;
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;
use std::time::Duration;

use chatstream::session::{SessionOptions, StreamSession};
use chatstream::transport::TransportNegotiator;

pub const TEST_BASE_URL: &str = "http://chat.test";
pub const TEST_API_KEY: &str = "test-api-key";

/// A long response, well past the default re-emission threshold.
pub fn long_text() -> String {
    "Streaming keeps long answers readable while they arrive. ".repeat(8)
}

/// Session over the given mock transports.
pub fn session_with(
    http: Arc<MockHttpClient>,
    ws: Arc<MockWsConnector>,
    options: SessionOptions,
) -> StreamSession {
    let negotiator = TransportNegotiator::new(
        http,
        ws,
        TEST_BASE_URL,
        Some(TEST_API_KEY.to_string()),
    );
    StreamSession::new(negotiator, options)
}

/// Session whose SSE endpoint answers with `payloads` and whose WebSocket
/// endpoint is never reachable.
pub fn sse_session(payloads: &[&str]) -> StreamSession {
    session_with(
        Arc::new(MockHttpClient::with_default(MockResponse::sse(payloads))),
        Arc::new(MockWsConnector::refusing(WsError::ConnectionFailed(
            "no websocket in this test".to_string(),
        ))),
        SessionOptions::default(),
    )
}

/// Options with a short deadline.
pub fn short_timeout(secs: u64) -> SessionOptions {
    SessionOptions::default().with_timeout(Duration::from_secs(secs))
}
