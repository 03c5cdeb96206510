//! Mock HTTP client for testing.
//!
//! Responses are scripted per URL. Streaming responses can end normally,
//! fail mid-body, stay open forever, or never open at all, which covers the
//! timeout, cancellation and fallback paths of a stream session.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail before any response arrives
    Error(HttpError),
    /// Stream these chunks, then end the body
    Stream(Vec<Bytes>),
    /// Stream these chunks, then fail
    StreamThenError(Vec<Bytes>, HttpError),
    /// Stream these chunks, then keep the body open forever
    StreamThenHang(Vec<Bytes>),
    /// Never resolve the request
    Pending,
    /// Wait before producing the inner response
    Delayed(Duration, Box<MockResponse>),
}

impl MockResponse {
    /// SSE body built from `data:` payloads, one event per payload.
    pub fn sse(payloads: &[&str]) -> Self {
        MockResponse::Stream(sse_chunks(payloads))
    }

    /// SSE body that stays open after the given payloads.
    pub fn sse_then_hang(payloads: &[&str]) -> Self {
        MockResponse::StreamThenHang(sse_chunks(payloads))
    }

    /// Wrap this response in an open delay.
    pub fn delayed(self, delay: Duration) -> Self {
        MockResponse::Delayed(delay, Box::new(self))
    }
}

/// Encode payloads as `data: <payload>\n\n` chunks.
pub fn sse_chunks(payloads: &[&str]) -> Vec<Bytes> {
    payloads
        .iter()
        .map(|payload| Bytes::from(format!("data: {}\n\n", payload)))
        .collect()
}

/// Mock HTTP client for testing.
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://test/chat/stream",
///     MockResponse::sse(&[r#"{"type":"token","content":"Hi"}"#, "[DONE]"]),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses by URL (exact, then prefix)
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a client that answers every request with `response`.
    pub fn with_default(response: MockResponse) -> Self {
        let client = Self::new();
        client.set_default_response(response);
        client
    }

    /// Set a response for a URL or URL prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }

    /// Resolve delays and pending responses.
    async fn resolve(&self, url: &str) -> Result<MockResponse, HttpError> {
        let mut response = self
            .get_response(url)
            .ok_or_else(|| HttpError::Other(format!("No mock response for URL: {}", url)))?;

        loop {
            match response {
                MockResponse::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    response = *inner;
                }
                MockResponse::Pending => return futures::future::pending().await,
                MockResponse::Error(err) => return Err(err),
                other => return Ok(other),
            }
        }
    }

    async fn buffered(&self, url: &str) -> Result<Response, HttpError> {
        match self.resolve(url).await? {
            MockResponse::Success(response) => Ok(response),
            _ => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);
        self.buffered(url).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.buffered(url).await
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        self.record_request("GET", url, headers, None);

        match self.resolve(url).await? {
            MockResponse::Stream(chunks) => Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok)))),
            MockResponse::StreamThenError(chunks, err) => Ok(Box::pin(
                stream::iter(chunks.into_iter().map(Ok)).chain(stream::once(async move { Err(err) })),
            )),
            MockResponse::StreamThenHang(chunks) => Ok(Box::pin(
                stream::iter(chunks.into_iter().map(Ok)).chain(stream::pending()),
            )),
            MockResponse::Success(response) if !response.is_success() => {
                let message = response.text().unwrap_or_default();
                Err(HttpError::ServerError {
                    status: response.status,
                    message,
                })
            }
            _ => Err(HttpError::Other(
                "Non-stream response on stream request".to_string(),
            )),
        }
    }
}
