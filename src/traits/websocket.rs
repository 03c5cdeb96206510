//! WebSocket connector trait abstraction.
//!
//! A connector turns a URL into a live [`WsClient`] channel handle. The
//! production connector drives tokio-tungstenite; the mock hands back the
//! far end of in-memory channels.

use async_trait::async_trait;

use crate::websocket::{WsClient, WsError};

/// Trait for opening WebSocket connections.
#[async_trait]
pub trait WebSocketConnector: Send + Sync {
    /// Open a connection to `url`.
    ///
    /// Resolves once the upgrade handshake has completed. No application
    /// frames have been sent when this returns.
    async fn connect(&self, url: &str) -> Result<WsClient, WsError>;
}
