//! SSE request building and byte-to-line splitting.

use futures::stream::{self, StreamExt};

use super::ChunkSource;
use crate::error::StreamError;
use crate::models::StreamRequest;
use crate::traits::{ByteStream, Headers};

/// Path of the streaming endpoint, relative to the base URL
pub const STREAM_PATH: &str = "/chat/stream";

/// Build `GET <base>/chat/stream?message=...` for `request`.
pub fn stream_url(base_url: &str, request: &StreamRequest) -> String {
    let query = request
        .query_params()
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}{}?{}", base_url.trim_end_matches('/'), STREAM_PATH, query)
}

/// Request headers for the stream. The API key travels out-of-band here.
pub fn stream_headers(api_key: Option<&str>) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), "text/event-stream".to_string());
    headers.insert("Cache-Control".to_string(), "no-cache".to_string());
    if let Some(key) = api_key {
        headers.insert("Authorization".to_string(), format!("Bearer {}", key));
    }
    headers
}

/// Split a body into lines.
///
/// Lines are cut at `\n` with a trailing `\r` removed; blank lines are kept
/// since they delimit SSE events. Bytes are buffered until a full line is
/// available so multi-byte characters split across chunks survive.
pub fn sse_lines(bytes_stream: ByteStream) -> ChunkSource {
    let lines = stream::unfold(
        (bytes_stream, Vec::<u8>::new(), false),
        |(mut bytes_stream, mut buffer, mut finished)| async move {
            loop {
                if let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line = take_line(&mut buffer, newline_pos);
                    return Some((Ok(line), (bytes_stream, buffer, finished)));
                }

                if finished {
                    return None;
                }

                match bytes_stream.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        finished = true;
                        buffer.clear();
                        let err = StreamError::Transport {
                            message: e.to_string(),
                        };
                        return Some((Err(err), (bytes_stream, buffer, finished)));
                    }
                    None => {
                        finished = true;
                        if !buffer.is_empty() {
                            let end = buffer.len();
                            let line = take_line(&mut buffer, end);
                            return Some((Ok(line), (bytes_stream, buffer, finished)));
                        }
                        return None;
                    }
                }
            }
        },
    );

    Box::pin(lines)
}

/// Remove `buffer[..end]` plus the newline at `end`, if any
fn take_line(buffer: &mut Vec<u8>, end: usize) -> String {
    let consumed = (end + 1).min(buffer.len());
    let raw: Vec<u8> = buffer.drain(..consumed).take(end).collect();
    let line = String::from_utf8_lossy(&raw);
    line.trim_end_matches('\r').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgentOverride;
    use crate::traits::HttpError;
    use bytes::Bytes;

    fn byte_stream(chunks: Vec<Result<Bytes, HttpError>>) -> ByteStream {
        Box::pin(stream::iter(chunks))
    }

    async fn collect(chunks: Vec<Result<Bytes, HttpError>>) -> Vec<Result<String, StreamError>> {
        sse_lines(byte_stream(chunks)).collect().await
    }

    #[test]
    fn test_stream_url_encodes_params() {
        let request = StreamRequest::new("hello world & more")
            .with_conversation("c 1")
            .with_agent_override(AgentOverride::Code);
        let url = stream_url("http://localhost:8000/", &request);
        assert_eq!(
            url,
            "http://localhost:8000/chat/stream?message=hello%20world%20%26%20more&conversation_id=c%201&agent_override=code"
        );
    }

    #[test]
    fn test_stream_headers() {
        let headers = stream_headers(Some("secret"));
        assert_eq!(headers.get("Accept"), Some(&"text/event-stream".to_string()));
        assert_eq!(
            headers.get("Authorization"),
            Some(&"Bearer secret".to_string())
        );
        assert!(!stream_headers(None).contains_key("Authorization"));
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let lines = collect(vec![
            Ok(Bytes::from("data: {\"a\"")),
            Ok(Bytes::from(":1}\r\n\r\ndata: [DONE]\n")),
        ])
        .await;
        assert_eq!(
            lines,
            vec![
                Ok("data: {\"a\":1}".to_string()),
                Ok(String::new()),
                Ok("data: [DONE]".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_trailing_partial_line_is_flushed() {
        let lines = collect(vec![Ok(Bytes::from("data: x\ndata: y"))]).await;
        assert_eq!(
            lines,
            vec![Ok("data: x".to_string()), Ok("data: y".to_string())]
        );
    }

    #[tokio::test]
    async fn test_multibyte_char_split_across_chunks() {
        let text = "data: héllo\n".as_bytes();
        let split = text.iter().position(|b| *b == 0xC3).unwrap() + 1;
        let lines = collect(vec![
            Ok(Bytes::copy_from_slice(&text[..split])),
            Ok(Bytes::copy_from_slice(&text[split..])),
        ])
        .await;
        assert_eq!(lines, vec![Ok("data: héllo".to_string())]);
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let lines = collect(vec![
            Ok(Bytes::from("data: a\n")),
            Err(HttpError::Io("reset".to_string())),
            Ok(Bytes::from("data: never\n")),
        ])
        .await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Ok("data: a".to_string()));
        assert!(matches!(lines[1], Err(StreamError::Transport { .. })));
    }
}
