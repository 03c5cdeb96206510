// Integration tests for environment-driven configuration
// Each test owns the CHATSTREAM_* variables while it runs.

use std::time::Duration;

use chatstream::config::{
    ClientConfig, DEFAULT_BASE_URL, ENV_API_KEY, ENV_BASE_URL, ENV_CHUNK_DELAY_MS,
    ENV_CHUNK_SIZE, ENV_CHUNK_THRESHOLD, ENV_TIMEOUT_SECS, ENV_TRANSPORT,
};
use chatstream::error::{ClientError, ErrorCategory};
use chatstream::transport::TransportMode;
use serial_test::serial;

const ALL_KEYS: [&str; 7] = [
    ENV_BASE_URL,
    ENV_API_KEY,
    ENV_TIMEOUT_SECS,
    ENV_TRANSPORT,
    ENV_CHUNK_THRESHOLD,
    ENV_CHUNK_SIZE,
    ENV_CHUNK_DELAY_MS,
];

fn clear_env() {
    for key in ALL_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert!(config.api_key.is_none());
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(
        config.strategy.steps(),
        &[TransportMode::Sse, TransportMode::WebSocket]
    );
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var(ENV_BASE_URL, "https://chat.example.com/");
    std::env::set_var(ENV_API_KEY, "secret");
    std::env::set_var(ENV_TIMEOUT_SECS, "12");
    std::env::set_var(ENV_TRANSPORT, "sse");
    std::env::set_var(ENV_CHUNK_THRESHOLD, "50");
    std::env::set_var(ENV_CHUNK_SIZE, "8");
    std::env::set_var(ENV_CHUNK_DELAY_MS, "20");

    let config = ClientConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.base_url, "https://chat.example.com");
    assert_eq!(config.api_key.as_deref(), Some("secret"));
    assert_eq!(config.timeout, Duration::from_secs(12));
    assert_eq!(config.strategy.steps(), &[TransportMode::Sse]);
    assert_eq!(config.chunking.threshold, 50);
    assert_eq!(config.chunking.chunk_size, 8);
    assert_eq!(config.chunking.delay, Duration::from_millis(20));
}

#[test]
#[serial]
fn test_from_env_invalid_transport() {
    clear_env();
    std::env::set_var(ENV_TRANSPORT, "smoke-signals");

    let err = ClientConfig::from_env().unwrap_err();
    clear_env();

    assert!(matches!(err, ClientError::Config { ref key, .. } if key == ENV_TRANSPORT));
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(!err.is_retryable());
}

#[test]
#[serial]
fn test_from_env_invalid_timeout() {
    clear_env();
    std::env::set_var(ENV_TIMEOUT_SECS, "-3");

    let result = ClientConfig::from_env();
    clear_env();

    assert!(result.is_err());
}
