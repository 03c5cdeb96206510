use std::str::FromStr;

use super::TransportMode;

/// Ordered transports to try when opening a session.
///
/// Each mode is attempted at most once and only while nothing has been
/// received, so a two-step strategy is exactly one fallback attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportStrategy {
    steps: Vec<TransportMode>,
}

impl TransportStrategy {
    /// SSE first, WebSocket once if SSE cannot be established.
    pub fn sse_then_websocket() -> Self {
        Self {
            steps: vec![TransportMode::Sse, TransportMode::WebSocket],
        }
    }

    /// Use only `mode`, with no fallback.
    pub fn single(mode: TransportMode) -> Self {
        Self { steps: vec![mode] }
    }

    pub fn steps(&self) -> &[TransportMode] {
        &self.steps
    }

    /// First mode to try
    pub fn primary(&self) -> TransportMode {
        self.steps.first().copied().unwrap_or(TransportMode::Sse)
    }

    /// Mode to try after `failed` could not be opened, if any
    pub fn next_after(&self, failed: TransportMode) -> Option<TransportMode> {
        let index = self.steps.iter().position(|mode| *mode == failed)?;
        self.steps.get(index + 1).copied()
    }
}

impl Default for TransportStrategy {
    fn default() -> Self {
        Self::sse_then_websocket()
    }
}

impl FromStr for TransportStrategy {
    type Err = String;

    /// `auto`, `sse` or `websocket`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::sse_then_websocket()),
            other => other.parse::<TransportMode>().map(Self::single),
        }
    }
}

impl IntoIterator for TransportStrategy {
    type Item = TransportMode;
    type IntoIter = std::vec::IntoIter<TransportMode>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_two_step() {
        let strategy = TransportStrategy::default();
        assert_eq!(
            strategy.steps(),
            &[TransportMode::Sse, TransportMode::WebSocket]
        );
        assert_eq!(strategy.primary(), TransportMode::Sse);
        assert_eq!(
            strategy.next_after(TransportMode::Sse),
            Some(TransportMode::WebSocket)
        );
        assert_eq!(strategy.next_after(TransportMode::WebSocket), None);
    }

    #[test]
    fn test_single_has_no_fallback() {
        let strategy = TransportStrategy::single(TransportMode::WebSocket);
        assert_eq!(strategy.primary(), TransportMode::WebSocket);
        assert_eq!(strategy.next_after(TransportMode::WebSocket), None);
        assert_eq!(strategy.next_after(TransportMode::Sse), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "auto".parse::<TransportStrategy>(),
            Ok(TransportStrategy::sse_then_websocket())
        );
        assert_eq!(
            "sse".parse::<TransportStrategy>(),
            Ok(TransportStrategy::single(TransportMode::Sse))
        );
        assert!("smoke".parse::<TransportStrategy>().is_err());
    }

    #[test]
    fn test_into_iter_order() {
        let modes: Vec<_> = TransportStrategy::default().into_iter().collect();
        assert_eq!(modes, vec![TransportMode::Sse, TransportMode::WebSocket]);
    }
}
