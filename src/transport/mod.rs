//! Transport selection and the transport-agnostic chunk source.
//!
//! Both transports are reduced to the same thing: a stream of raw text
//! chunks (SSE lines or WebSocket text frames) that the frame parser
//! understands, plus a way to close it.

mod negotiator;
pub mod sse;
mod strategy;

use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;
use tracing::debug;

use crate::error::StreamError;

pub use negotiator::{websocket_url, TransportNegotiator, WEBSOCKET_PATH};
pub use strategy::TransportStrategy;

/// Wire transport for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Sse,
    WebSocket,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Sse => "sse",
            TransportMode::WebSocket => "websocket",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sse" => Ok(TransportMode::Sse),
            "websocket" | "ws" => Ok(TransportMode::WebSocket),
            other => Err(format!("unknown transport '{}'", other)),
        }
    }
}

/// Raw text chunks from an open transport.
///
/// An `Err` item ends the stream. Running out of items without a terminal
/// frame means the peer went away.
pub type ChunkSource = Pin<Box<dyn Stream<Item = Result<String, StreamError>> + Send>>;

/// An established transport, ready to be read.
pub struct OpenedTransport {
    mode: TransportMode,
    source: ChunkSource,
}

impl OpenedTransport {
    pub fn new(mode: TransportMode, source: ChunkSource) -> Self {
        Self { mode, source }
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Mutable access to the chunk stream
    pub fn source(&mut self) -> &mut ChunkSource {
        &mut self.source
    }

    /// Close the transport. Nothing is read from it afterwards.
    pub fn close(self) {
        debug!(transport = %self.mode, "Closing transport");
    }
}

impl fmt::Debug for OpenedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenedTransport")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_mode_parse() {
        assert_eq!("sse".parse::<TransportMode>(), Ok(TransportMode::Sse));
        assert_eq!("WebSocket".parse::<TransportMode>(), Ok(TransportMode::WebSocket));
        assert_eq!("ws".parse::<TransportMode>(), Ok(TransportMode::WebSocket));
        assert!("carrier-pigeon".parse::<TransportMode>().is_err());
    }

    #[test]
    fn test_transport_mode_serde() {
        assert_eq!(
            serde_json::to_string(&TransportMode::WebSocket).unwrap(),
            "\"websocket\""
        );
        assert_eq!(
            serde_json::from_str::<TransportMode>("\"sse\"").unwrap(),
            TransportMode::Sse
        );
        assert_eq!(TransportMode::Sse.to_string(), "sse");
    }
}
