//! Client configuration.
//!
//! Built with `with_*` setters or loaded from `CHATSTREAM_*` environment
//! variables.
//!
//! # Example
//!
//! ```ignore
//! use chatstream::config::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new("http://localhost:8000")
//!     .with_api_key("secret")
//!     .with_timeout(Duration::from_secs(10));
//! ```

use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};
use crate::session::{ChunkingPolicy, SessionOptions, DEFAULT_TIMEOUT};
use crate::transport::TransportStrategy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const ENV_BASE_URL: &str = "CHATSTREAM_BASE_URL";
pub const ENV_API_KEY: &str = "CHATSTREAM_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "CHATSTREAM_TIMEOUT_SECS";
pub const ENV_TRANSPORT: &str = "CHATSTREAM_TRANSPORT";
pub const ENV_CHUNK_THRESHOLD: &str = "CHATSTREAM_LEGACY_CHUNK_THRESHOLD";
pub const ENV_CHUNK_SIZE: &str = "CHATSTREAM_LEGACY_CHUNK_SIZE";
pub const ENV_CHUNK_DELAY_MS: &str = "CHATSTREAM_LEGACY_CHUNK_DELAY_MS";

/// Settings shared by every request a [`ChatClient`](crate::client::ChatClient) makes
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    /// Bearer token for SSE, `api_key` of the WebSocket auth frame
    pub api_key: Option<String>,
    /// Deadline for one streamed turn
    pub timeout: Duration,
    /// Transports to try, in order
    pub strategy: TransportStrategy,
    /// Re-emission of whole responses
    pub chunking: ChunkingPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            strategy: TransportStrategy::default(),
            chunking: ChunkingPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Set the base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_strategy(mut self, strategy: TransportStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_chunking(mut self, chunking: ChunkingPolicy) -> Self {
        self.chunking = chunking;
        self
    }

    /// Load from `CHATSTREAM_*` environment variables.
    ///
    /// Unset variables keep their defaults; set but invalid ones are a
    /// [`ClientError::Config`].
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(base_url) = get(ENV_BASE_URL) {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ClientError::config(
                    ENV_BASE_URL,
                    format!("expected an http(s) URL, got '{}'", base_url),
                ));
            }
            config = config.with_base_url(base_url);
        }
        config.api_key = get(ENV_API_KEY);

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_value(ENV_TIMEOUT_SECS, &raw)?;
            if secs == 0 {
                return Err(ClientError::config(ENV_TIMEOUT_SECS, "must be greater than zero"));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(ENV_TRANSPORT) {
            config.strategy = TransportStrategy::from_str(&raw)
                .map_err(|e| ClientError::config(ENV_TRANSPORT, e))?;
        }
        if let Some(raw) = get(ENV_CHUNK_THRESHOLD) {
            config.chunking.threshold = parse_value(ENV_CHUNK_THRESHOLD, &raw)?;
        }
        if let Some(raw) = get(ENV_CHUNK_SIZE) {
            let size: usize = parse_value(ENV_CHUNK_SIZE, &raw)?;
            if size == 0 {
                return Err(ClientError::config(ENV_CHUNK_SIZE, "must be greater than zero"));
            }
            config.chunking.chunk_size = size;
        }
        if let Some(raw) = get(ENV_CHUNK_DELAY_MS) {
            config.chunking.delay = Duration::from_millis(parse_value(ENV_CHUNK_DELAY_MS, &raw)?);
        }

        Ok(config)
    }

    /// Session options derived from this config
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::default()
            .with_timeout(self.timeout)
            .with_strategy(self.strategy.clone())
            .with_chunking(self.chunking)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> ClientResult<T> {
    raw.parse()
        .map_err(|_| ClientError::config(key, format!("invalid value '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportMode;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.strategy.steps(),
            &[TransportMode::Sse, TransportMode::WebSocket]
        );
    }

    #[test]
    fn test_all_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://chat.example.com/"),
            (ENV_API_KEY, "k"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_TRANSPORT, "websocket"),
            (ENV_CHUNK_THRESHOLD, "10"),
            (ENV_CHUNK_SIZE, "3"),
            (ENV_CHUNK_DELAY_MS, "15"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://chat.example.com");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.strategy.steps(), &[TransportMode::WebSocket]);
        assert_eq!(config.chunking.threshold, 10);
        assert_eq!(config.chunking.chunk_size, 3);
        assert_eq!(config.chunking.delay, Duration::from_millis(15));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            (ENV_TIMEOUT_SECS, "soon"),
            (ENV_TIMEOUT_SECS, "0"),
            (ENV_TRANSPORT, "carrier-pigeon"),
            (ENV_BASE_URL, "localhost:8000"),
            (ENV_CHUNK_SIZE, "0"),
        ] {
            let err = ClientConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            match err {
                ClientError::Config { key: k, .. } => assert_eq!(k, key),
                other => panic!("expected Config error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_session_options() {
        let options = ClientConfig::default()
            .with_timeout(Duration::from_secs(3))
            .session_options();
        assert_eq!(options.timeout, Duration::from_secs(3));
    }
}
