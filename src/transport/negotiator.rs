use futures::stream;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::sse::{sse_lines, stream_headers, stream_url};
use super::{ChunkSource, OpenedTransport, TransportMode};
use crate::error::StreamError;
use crate::models::StreamRequest;
use crate::traits::{HttpClient, WebSocketConnector};
use crate::websocket::{WsAuth, WsChat, WsClient, WsOutgoingMessage};

/// Path of the chat socket, relative to the base URL
pub const WEBSOCKET_PATH: &str = "/ws/chat";

/// Opens one transport for one request.
///
/// Holds no per-session state: each `open` call builds a fresh connection
/// and hands it to the caller.
#[derive(Clone)]
pub struct TransportNegotiator {
    http: Arc<dyn HttpClient>,
    ws: Arc<dyn WebSocketConnector>,
    base_url: String,
    api_key: Option<String>,
}

impl TransportNegotiator {
    pub fn new(
        http: Arc<dyn HttpClient>,
        ws: Arc<dyn WebSocketConnector>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            ws,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open `mode` for `request`.
    ///
    /// Any failure before the transport is readable is reported as
    /// [`StreamError::TransportOpen`].
    pub async fn open(
        &self,
        request: &StreamRequest,
        mode: TransportMode,
    ) -> Result<OpenedTransport, StreamError> {
        match mode {
            TransportMode::Sse => self.open_sse(request).await,
            TransportMode::WebSocket => self.open_websocket(request).await,
        }
    }

    async fn open_sse(&self, request: &StreamRequest) -> Result<OpenedTransport, StreamError> {
        let url = stream_url(&self.base_url, request);
        let headers = stream_headers(self.api_key.as_deref());
        debug!("Opening SSE stream at {}{}", self.base_url, super::sse::STREAM_PATH);

        let body = self.http.get_stream(&url, &headers).await.map_err(|e| {
            warn!("SSE open failed: {}", e);
            StreamError::TransportOpen {
                mode: TransportMode::Sse,
                message: e.to_string(),
            }
        })?;

        info!("SSE stream established");
        Ok(OpenedTransport::new(TransportMode::Sse, sse_lines(body)))
    }

    async fn open_websocket(
        &self,
        request: &StreamRequest,
    ) -> Result<OpenedTransport, StreamError> {
        let url = websocket_url(&self.base_url);
        let open_error = |message: String| StreamError::TransportOpen {
            mode: TransportMode::WebSocket,
            message,
        };

        let client = self.ws.connect(&url).await.map_err(|e| {
            warn!("WebSocket open failed: {}", e);
            open_error(e.to_string())
        })?;

        client
            .send(WsOutgoingMessage::Auth(WsAuth::new(self.api_key.clone())))
            .await
            .map_err(|e| open_error(e.to_string()))?;
        client
            .send(WsOutgoingMessage::Chat(WsChat::from(request)))
            .await
            .map_err(|e| open_error(e.to_string()))?;

        info!("WebSocket chat established at {}", url);
        Ok(OpenedTransport::new(
            TransportMode::WebSocket,
            websocket_frames(client),
        ))
    }
}

/// `<base>/ws/chat` with the scheme switched to `ws`/`wss`.
pub fn websocket_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}{}", base, WEBSOCKET_PATH)
}

/// Text frames from `client`. A peer close with a reason ends the stream
/// with [`StreamError::ConnectionClosed`] carrying it.
fn websocket_frames(client: WsClient) -> ChunkSource {
    let frames = stream::unfold(Some(client), |state| async move {
        let mut client = state?;
        match client.recv().await {
            Some(Ok(text)) => Some((Ok(text), Some(client))),
            Some(Err(e)) => Some((
                Err(StreamError::Transport {
                    message: e.to_string(),
                }),
                None,
            )),
            None => {
                let reason = client.close_reason();
                client.close();
                reason.map(|reason| {
                    (
                        Err(StreamError::ConnectionClosed {
                            reason: Some(reason),
                        }),
                        None,
                    )
                })
            }
        }
    });
    Box::pin(frames)
}
