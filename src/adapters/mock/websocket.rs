//! Mock WebSocket connector for testing.
//!
//! Each `connect` hands back a [`WsClient`] over in-memory channels. A
//! scripted peer task records the first outbound frames (auth then chat),
//! then plays the configured inbound frames and ends the way the script says.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};

use crate::traits::WebSocketConnector;
use crate::websocket::{WsClient, WsConnectionState, WsError};

/// Outbound frames the scripted peer waits for before replying
const HANDSHAKE_FRAMES: usize = 2;

/// How the scripted peer ends after its frames
#[derive(Debug, Clone, PartialEq)]
pub enum MockWsEnding {
    /// Close the socket, optionally with a reason
    Close(Option<String>),
    /// Fail the socket
    Error(WsError),
    /// Keep the socket open until the client goes away
    Hang,
}

#[derive(Debug, Clone)]
enum MockWsBehavior {
    Refuse(WsError),
    Pending,
    Respond {
        frames: Vec<String>,
        ending: MockWsEnding,
    },
}

/// Mock WebSocket connector for testing.
///
/// ```ignore
/// let ws = MockWsConnector::with_frames(vec![
///     r#"{"type":"token","content":"Hi"}"#.to_string(),
///     r#"{"response":"Hi","done":true}"#.to_string(),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct MockWsConnector {
    behavior: Arc<Mutex<MockWsBehavior>>,
    sent: Arc<Mutex<Vec<Value>>>,
    urls: Arc<Mutex<Vec<String>>>,
    connects: Arc<AtomicUsize>,
}

impl MockWsConnector {
    fn from_behavior(behavior: MockWsBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            sent: Arc::new(Mutex::new(Vec::new())),
            urls: Arc::new(Mutex::new(Vec::new())),
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Accept connections, reply with nothing and close.
    pub fn new() -> Self {
        Self::with_frames(Vec::new())
    }

    /// Accept connections, reply with `frames`, then close cleanly.
    pub fn with_frames(frames: Vec<String>) -> Self {
        Self::with_script(frames, MockWsEnding::Close(None))
    }

    /// Accept connections, reply with `frames`, then end per `ending`.
    pub fn with_script(frames: Vec<String>, ending: MockWsEnding) -> Self {
        Self::from_behavior(MockWsBehavior::Respond { frames, ending })
    }

    /// Fail every connection attempt.
    pub fn refusing(err: WsError) -> Self {
        Self::from_behavior(MockWsBehavior::Refuse(err))
    }

    /// Never complete a connection attempt.
    pub fn pending() -> Self {
        Self::from_behavior(MockWsBehavior::Pending)
    }

    /// Number of connection attempts.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// URLs passed to `connect`.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    /// Outbound frames recorded by the scripted peer, decoded.
    pub fn sent_messages(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockWsConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebSocketConnector for MockWsConnector {
    async fn connect(&self, url: &str) -> Result<WsClient, WsError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        let behavior = self.behavior.lock().unwrap().clone();
        let (frames, ending) = match behavior {
            MockWsBehavior::Refuse(err) => return Err(err),
            MockWsBehavior::Pending => return futures::future::pending().await,
            MockWsBehavior::Respond { frames, ending } => (frames, ending),
        };

        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<String>(16);
        let (incoming_tx, incoming_rx) = mpsc::channel(frames.len() + 1);
        let (state_tx, state_rx) = watch::channel(WsConnectionState::Connected);
        let sent = self.sent.clone();

        tokio::spawn(async move {
            for _ in 0..HANDSHAKE_FRAMES {
                match outgoing_rx.recv().await {
                    Some(json) => {
                        let value = serde_json::from_str(&json).unwrap_or(Value::String(json));
                        sent.lock().unwrap().push(value);
                    }
                    None => return,
                }
            }

            for frame in frames {
                if incoming_tx.send(Ok(frame)).await.is_err() {
                    return;
                }
            }

            match ending {
                MockWsEnding::Close(reason) => {
                    let _ = state_tx.send(WsConnectionState::Closed { reason });
                }
                MockWsEnding::Error(err) => {
                    let _ = incoming_tx.send(Err(err)).await;
                    let _ = state_tx.send(WsConnectionState::Closed { reason: None });
                }
                MockWsEnding::Hang => {
                    while outgoing_rx.recv().await.is_some() {}
                }
            }
        });

        Ok(WsClient::from_channels(outgoing_tx, incoming_rx, state_rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::{WsAuth, WsChat, WsOutgoingMessage};
    use crate::models::StreamRequest;

    async fn handshake(client: &WsClient) {
        client
            .send(WsOutgoingMessage::Auth(WsAuth::new(Some("k".to_string()))))
            .await
            .unwrap();
        client
            .send(WsOutgoingMessage::Chat(WsChat::from(&StreamRequest::new("hi"))))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_scripted_frames_after_handshake() {
        let connector = MockWsConnector::with_frames(vec!["one".to_string(), "two".to_string()]);
        let mut client = connector.connect("ws://test/ws/chat").await.unwrap();
        handshake(&client).await;

        assert_eq!(client.recv().await, Some(Ok("one".to_string())));
        assert_eq!(client.recv().await, Some(Ok("two".to_string())));
        assert_eq!(client.recv().await, None);

        let sent = connector.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0]["type"], "auth");
        assert_eq!(sent[1]["type"], "chat");
        assert_eq!(connector.urls(), vec!["ws://test/ws/chat".to_string()]);
    }

    #[tokio::test]
    async fn test_refusing() {
        let connector = MockWsConnector::refusing(WsError::ConnectionFailed("nope".to_string()));
        assert!(connector.connect("ws://x").await.is_err());
        assert_eq!(connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_error_ending() {
        let connector = MockWsConnector::with_script(
            vec!["frame".to_string()],
            MockWsEnding::Error(WsError::Transport("reset".to_string())),
        );
        let mut client = connector.connect("ws://x").await.unwrap();
        handshake(&client).await;

        assert_eq!(client.recv().await, Some(Ok("frame".to_string())));
        assert_eq!(
            client.recv().await,
            Some(Err(WsError::Transport("reset".to_string())))
        );
    }
}
