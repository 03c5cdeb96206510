use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use super::messages::WsOutgoingMessage;

/// Channel capacity for both directions
const CHANNEL_CAPACITY: usize = 100;

/// WebSocket connection errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WsError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Disconnected from server")]
    Disconnected,
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// The socket failed after the upgrade completed
    #[error("WebSocket transport error: {0}")]
    Transport(String),
    /// An outbound message could not be encoded
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl WsError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WsError::ConnectionFailed(_) | WsError::Disconnected | WsError::Transport(_)
        )
    }
}

/// WebSocket connection state
#[derive(Debug, Clone, PartialEq)]
pub enum WsConnectionState {
    Connected,
    /// The socket is gone. `reason` holds the peer's close reason, if any.
    Closed { reason: Option<String> },
}

/// Channel handle over one chat socket.
///
/// Outbound messages are serialized here and written by a background task;
/// inbound text frames are delivered unparsed. Dropping the handle closes
/// the socket.
pub struct WsClient {
    /// Serialized frames waiting to be written
    outgoing_tx: mpsc::Sender<String>,
    /// Text frames (or the error that ended the socket)
    incoming_rx: mpsc::Receiver<Result<String, WsError>>,
    /// Watch receiver for connection state changes
    state_rx: watch::Receiver<WsConnectionState>,
}

impl WsClient {
    /// Connect to a WebSocket endpoint.
    ///
    /// Returns once the upgrade succeeded; the read/write loop runs on a
    /// spawned task until either side goes away.
    pub async fn connect(url: &str) -> Result<Self, WsError> {
        let (ws_stream, _response) = connect_async(url)
            .await
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        info!("Connected to WebSocket server at {}", url);

        let (ws_sink, ws_stream) = ws_stream.split();

        let (incoming_tx, incoming_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (outgoing_tx, outgoing_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(WsConnectionState::Connected);

        tokio::spawn(run_connection_loop(
            ws_sink,
            ws_stream,
            incoming_tx,
            outgoing_rx,
            state_tx,
        ));

        Ok(Self::from_channels(outgoing_tx, incoming_rx, state_rx))
    }

    /// Build a client over existing channels.
    ///
    /// Used by connectors that are not backed by a real socket.
    pub fn from_channels(
        outgoing_tx: mpsc::Sender<String>,
        incoming_rx: mpsc::Receiver<Result<String, WsError>>,
        state_rx: watch::Receiver<WsConnectionState>,
    ) -> Self {
        Self {
            outgoing_tx,
            incoming_rx,
            state_rx,
        }
    }

    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        matches!(*self.state_rx.borrow(), WsConnectionState::Connected)
    }

    /// Get the current connection state
    pub fn connection_state(&self) -> WsConnectionState {
        self.state_rx.borrow().clone()
    }

    /// Close reason reported by the peer, once closed
    pub fn close_reason(&self) -> Option<String> {
        match &*self.state_rx.borrow() {
            WsConnectionState::Closed { reason } => reason.clone(),
            WsConnectionState::Connected => None,
        }
    }

    /// Serialize and queue a message for the server
    pub async fn send(&self, msg: WsOutgoingMessage) -> Result<(), WsError> {
        let json = serde_json::to_string(&msg).map_err(|e| WsError::Protocol(e.to_string()))?;
        debug!("Queueing {} frame", msg.kind());
        self.outgoing_tx
            .send(json)
            .await
            .map_err(|e| WsError::SendFailed(e.to_string()))
    }

    /// Receive the next inbound text frame.
    ///
    /// `None` means the socket closed.
    pub async fn recv(&mut self) -> Option<Result<String, WsError>> {
        self.incoming_rx.recv().await
    }

    /// Close the socket
    pub fn close(self) {
        info!("Closing WebSocket client");
    }
}

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Pump frames between the socket and the client channels until one side ends
async fn run_connection_loop(
    mut ws_sink: futures_util::stream::SplitSink<WsStream, Message>,
    mut ws_stream: futures_util::stream::SplitStream<WsStream>,
    incoming_tx: mpsc::Sender<Result<String, WsError>>,
    mut outgoing_rx: mpsc::Receiver<String>,
    state_tx: watch::Sender<WsConnectionState>,
) {
    let mut close_reason = None;

    loop {
        tokio::select! {
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Received frame ({} bytes)", text.len());
                        if incoming_tx.send(Ok(text)).await.is_err() {
                            debug!("Incoming channel closed, shutting down");
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                        Ok(text) => {
                            if incoming_tx.send(Ok(text)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Skipping non-UTF-8 binary frame: {}", e),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        close_reason = frame
                            .map(|f| f.reason.to_string())
                            .filter(|reason| !reason.is_empty());
                        info!("Received close frame from server");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        debug!("Received ping, sending pong");
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        let _ = incoming_tx.send(Err(WsError::Transport(e.to_string()))).await;
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        break;
                    }
                }
            }
            outgoing = outgoing_rx.recv() => {
                match outgoing {
                    Some(json) => {
                        if let Err(e) = ws_sink.send(Message::Text(json)).await {
                            error!("Failed to send frame: {}", e);
                            let _ = incoming_tx.send(Err(WsError::SendFailed(e.to_string()))).await;
                            break;
                        }
                    }
                    None => {
                        debug!("Client dropped, closing socket");
                        let _ = ws_sink.close().await;
                        break;
                    }
                }
            }
        }
    }

    let _ = state_tx.send(WsConnectionState::Closed {
        reason: close_reason,
    });
    info!("Connection loop ended");
}
