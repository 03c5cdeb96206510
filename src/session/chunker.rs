//! Re-emission of whole responses as token-sized pieces.
//!
//! Servers that answer with one complete response still get incremental
//! rendering: the text is cut into fixed-size pieces that the session
//! delivers one per tick.

use std::time::Duration;

/// When and how a whole response is re-emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingPolicy {
    /// Responses longer than this many characters are re-emitted
    pub threshold: usize,
    /// Characters per piece
    pub chunk_size: usize,
    /// Pause between pieces; zero yields to the scheduler instead
    pub delay: Duration,
}

impl Default for ChunkingPolicy {
    fn default() -> Self {
        Self {
            threshold: 200,
            chunk_size: 24,
            delay: Duration::ZERO,
        }
    }
}

impl ChunkingPolicy {
    /// Never re-emit
    pub fn disabled() -> Self {
        Self {
            threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// True if `text` should be re-emitted
    pub fn applies_to(&self, text: &str) -> bool {
        self.threshold != usize::MAX && text.chars().count() > self.threshold
    }

    /// Wait between two pieces
    pub async fn pace(&self) {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Iterator over fixed-size pieces of a response.
///
/// Pieces are counted in characters, never splitting a UTF-8 sequence.
/// The last piece may be shorter.
#[derive(Debug, Clone)]
pub struct ResponseChunker<'a> {
    remaining: &'a str,
    chunk_size: usize,
}

impl<'a> ResponseChunker<'a> {
    pub fn new(text: &'a str, chunk_size: usize) -> Self {
        Self {
            remaining: text,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl<'a> Iterator for ResponseChunker<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let split = self
            .remaining
            .char_indices()
            .nth(self.chunk_size)
            .map(|(index, _)| index)
            .unwrap_or(self.remaining.len());
        let (piece, rest) = self.remaining.split_at(split);
        self.remaining = rest;
        Some(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_size_pieces() {
        let pieces: Vec<_> = ResponseChunker::new("abcdefghij", 4).collect();
        assert_eq!(pieces, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_pieces_rejoin_to_original() {
        let text = "The quick brown fox jumps over the lazy dog";
        let joined: String = ResponseChunker::new(text, 7).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let pieces: Vec<_> = ResponseChunker::new("héllo wörld", 3).collect();
        assert_eq!(pieces, vec!["hél", "lo ", "wör", "ld"]);
    }

    #[test]
    fn test_empty_and_zero_size() {
        assert_eq!(ResponseChunker::new("", 5).count(), 0);
        assert_eq!(ResponseChunker::new("abc", 0).count(), 3);
    }

    #[test]
    fn test_policy_threshold() {
        let policy = ChunkingPolicy {
            threshold: 5,
            ..ChunkingPolicy::default()
        };
        assert!(!policy.applies_to("12345"));
        assert!(policy.applies_to("123456"));
        assert!(!ChunkingPolicy::disabled().applies_to(&"x".repeat(10_000)));
    }
}
