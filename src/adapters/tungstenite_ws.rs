//! Tungstenite-based WebSocket connector.

use async_trait::async_trait;

use crate::traits::WebSocketConnector;
use crate::websocket::{WsClient, WsError};

/// Opens real sockets through [`WsClient::connect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WebSocketConnector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<WsClient, WsError> {
        WsClient::connect(url).await
    }
}
