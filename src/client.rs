//! Chat client facade.
//!
//! Streaming turns go through a [`StreamSession`]; `send_message` and
//! `health_check` are plain request/response calls that fail directly.

use std::sync::Arc;

use tracing::{debug, info};

use crate::adapters::{ReqwestHttpClient, TungsteniteConnector};
use crate::config::ClientConfig;
use crate::error::{ClientResult, NetworkError};
use crate::models::{ChatResponse, StreamRequest};
use crate::session::{SessionOutcome, StreamObserver, StreamSession};
use crate::traits::{Headers, HttpClient, WebSocketConnector};
use crate::transport::{TransportNegotiator, TransportStrategy};

pub const CHAT_PATH: &str = "/chat";
pub const HEALTH_PATH: &str = "/health";

/// Client for one chat backend
pub struct ChatClient {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
    ws: Arc<dyn WebSocketConnector>,
}

impl ChatClient {
    /// Client using reqwest for HTTP and tokio-tungstenite for WebSocket
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transports(
            config,
            Arc::new(ReqwestHttpClient::new()),
            Arc::new(TungsteniteConnector),
        )
    }

    /// Client over the given transports
    pub fn with_transports(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        ws: Arc<dyn WebSocketConnector>,
    ) -> Self {
        Self { config, http, ws }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A fresh session using the configured strategy
    pub fn session(&self) -> StreamSession {
        StreamSession::new(self.negotiator(), self.config.session_options())
    }

    /// A fresh session forced onto `strategy`
    pub fn session_with_strategy(&self, strategy: TransportStrategy) -> StreamSession {
        let options = self.config.session_options().with_strategy(strategy);
        StreamSession::new(self.negotiator(), options)
    }

    /// Stream one turn in a fresh session.
    pub async fn stream<O>(&self, request: StreamRequest, observer: &mut O) -> SessionOutcome
    where
        O: StreamObserver + ?Sized,
    {
        self.session().send(request, observer).await
    }

    /// Send `request` and wait for the whole response.
    ///
    /// No fallback applies: any failure is returned as is.
    pub async fn send_message(&self, request: &StreamRequest) -> ClientResult<ChatResponse> {
        let url = format!("{}{}", self.config.base_url, CHAT_PATH);
        let body = serde_json::to_string(request)?;

        debug!(url = %url, "Sending single-shot chat request");
        let response = self
            .http
            .post(&url, &body, &self.headers())
            .await
            .map_err(NetworkError::from)?;

        if !response.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NetworkError::HttpStatus {
                status: response.status,
                message,
            }
            .into());
        }

        let mut chat: ChatResponse = response.json()?;
        if chat.conversation_id.is_empty() {
            if let Some(conversation_id) = &request.conversation_id {
                chat.conversation_id = conversation_id.clone();
            }
        }
        info!(conversation_id = %chat.conversation_id, "Single-shot chat completed");
        Ok(chat)
    }

    /// True if the backend answers its health endpoint with 2xx.
    pub async fn health_check(&self) -> ClientResult<bool> {
        let url = format!("{}{}", self.config.base_url, HEALTH_PATH);
        let response = self
            .http
            .get(&url, &self.headers())
            .await
            .map_err(NetworkError::from)?;
        Ok(response.is_success())
    }

    fn negotiator(&self) -> TransportNegotiator {
        TransportNegotiator::new(
            Arc::clone(&self.http),
            Arc::clone(&self.ws),
            self.config.base_url.clone(),
            self.config.api_key.clone(),
        )
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(api_key) = &self.config.api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", api_key));
        }
        headers
    }
}
