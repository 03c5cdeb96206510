//! Stream session: one chat turn from `send` to its terminal outcome.
//!
//! A session opens a transport (falling back from SSE to WebSocket once if
//! the first cannot be established), feeds every raw chunk through the
//! frame parser, accumulates text, tracks agent tasks and reports to a
//! [`StreamObserver`]. The whole turn, transport negotiation included, runs
//! under one deadline. The deadline and caller cancellation share a single
//! [`AbortController`], so whichever fires first aborts the in-flight
//! transport exactly once.
//!
//! Failures are resolved by the [`FallbackPolicy`]: timeouts and early
//! hang-ups degrade to a fallback response, cancellation is silent, and only
//! failures with nothing to show reach `on_error`.

pub mod abort;
pub mod chunker;
pub mod observer;
pub mod status;

use std::collections::BTreeMap;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::StreamError;
use crate::fallback::{FallbackDecision, FallbackPolicy};
use crate::models::{ChatResponse, StreamRequest};
use crate::protocol::{DoneEvent, EventFrame, FrameParser};
use crate::state::AgentTaskTracker;
use crate::transport::{OpenedTransport, TransportMode, TransportNegotiator, TransportStrategy};

pub use abort::{AbortController, AbortReason, AbortSignal, CancelHandle};
pub use chunker::{ChunkingPolicy, ResponseChunker};
pub use observer::{NoopObserver, StreamObserver, StreamingChunk};
pub use status::SessionStatus;

/// Default deadline for one turn
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-session knobs
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Deadline measured from `send`, covering negotiation and streaming
    pub timeout: Duration,
    pub strategy: TransportStrategy,
    pub chunking: ChunkingPolicy,
    pub fallback: FallbackPolicy,
    /// Treat `content` that extends the text so far as a cumulative snapshot.
    /// Disable for servers that only send increments, where a token that
    /// happens to repeat the whole text would otherwise be swallowed.
    pub cumulative_tokens: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            strategy: TransportStrategy::default(),
            chunking: ChunkingPolicy::default(),
            fallback: FallbackPolicy::default(),
            cumulative_tokens: true,
        }
    }
}

impl SessionOptions {
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

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_cumulative_tokens(mut self, cumulative: bool) -> Self {
        self.cumulative_tokens = cumulative;
        self
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// A `done` frame arrived; `on_complete` fired
    Completed(ChatResponse),
    /// A fallback response was synthesized; `on_complete` fired
    Degraded(ChatResponse),
    /// `on_error` fired, except for [`StreamError::SessionReused`]
    Failed(StreamError),
    /// The caller cancelled; nothing fired
    Cancelled,
}

impl SessionOutcome {
    /// The response delivered through `on_complete`, if any
    pub fn response(&self) -> Option<&ChatResponse> {
        match self {
            SessionOutcome::Completed(response) | SessionOutcome::Degraded(response) => {
                Some(response)
            }
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&StreamError> {
        match self {
            SessionOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SessionOutcome::Degraded(_))
    }
}

/// Owner of one chat turn.
///
/// Created per request and sent once. [`cancel_handle`](Self::cancel_handle)
/// gives other tasks a way to cancel while `send` is running.
pub struct StreamSession {
    id: Uuid,
    negotiator: TransportNegotiator,
    options: SessionOptions,
    abort: AbortController,
    status: SessionStatus,
    parser: FrameParser,
    accumulated: String,
    conversation_id: Option<String>,
    transport: Option<TransportMode>,
    tasks: AgentTaskTracker,
    sent: bool,
}

impl StreamSession {
    pub fn new(negotiator: TransportNegotiator, options: SessionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            negotiator,
            options,
            abort: AbortController::new(),
            status: SessionStatus::Idle,
            parser: FrameParser::new(),
            accumulated: String::new(),
            conversation_id: None,
            transport: None,
            tasks: AgentTaskTracker::new(),
            sent: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Text received so far
    pub fn accumulated_text(&self) -> &str {
        &self.accumulated
    }

    /// Transport that was actually used, once one opened
    pub fn transport(&self) -> Option<TransportMode> {
        self.transport
    }

    /// Progress of in-flight agent tasks
    pub fn tasks(&self) -> BTreeMap<String, f64> {
        self.tasks.snapshot()
    }

    /// Conversation id from the request or the backend
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Why the session was aborted, if it was
    pub fn abort_reason(&self) -> Option<AbortReason> {
        self.abort.reason()
    }

    /// Frames that failed to parse and were skipped
    pub fn skipped_frames(&self) -> u64 {
        self.parser.skipped()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(self.abort.clone())
    }

    /// Cancel the session. Nothing is reported for a cancelled session.
    pub fn cancel(&self) {
        if self.abort.abort(AbortReason::Cancelled) {
            info!(session_id = %self.id, "Session cancelled by caller");
        }
    }

    /// Run the turn for `request`, reporting to `observer`.
    ///
    /// Never fails: every ending is a [`SessionOutcome`]. A session runs
    /// once; sending again yields `Failed(SessionReused)` without callbacks.
    pub async fn send<O>(&mut self, request: StreamRequest, observer: &mut O) -> SessionOutcome
    where
        O: StreamObserver + ?Sized,
    {
        if self.sent {
            warn!(session_id = %self.id, "Session already sent");
            return SessionOutcome::Failed(StreamError::SessionReused);
        }
        self.sent = true;

        let span = info_span!("stream_session", session_id = %self.id);
        self.run(request, observer).instrument(span).await
    }

    async fn run<O>(&mut self, request: StreamRequest, observer: &mut O) -> SessionOutcome
    where
        O: StreamObserver + ?Sized,
    {
        self.conversation_id = request.conversation_id.clone();
        self.transition(SessionStatus::Connecting);

        let timeout = self.options.timeout;
        let abort = self.abort.clone();
        let mut signal = self.abort.signal();

        let result = {
            let deadline = tokio::time::sleep(timeout);
            let drive = self.drive(&request, observer);
            tokio::pin!(deadline);
            tokio::pin!(drive);

            tokio::select! {
                biased;
                reason = signal.aborted() => Err(abort_error(reason, timeout)),
                _ = &mut deadline => {
                    abort.abort(AbortReason::Timeout);
                    Err(abort_error(abort.reason().unwrap_or(AbortReason::Timeout), timeout))
                }
                result = &mut drive => result,
            }
        };

        // A cancel racing the last frame still wins
        let result = match (result, self.abort.reason()) {
            (Ok(_), Some(AbortReason::Cancelled)) => Err(StreamError::Cancelled),
            (result, _) => result,
        };

        match result {
            Ok(response) => {
                info!(
                    transport = ?self.transport,
                    chars = response.response.len(),
                    "Session completed"
                );
                self.transition(SessionStatus::Completed);
                observer.on_complete(&response);
                SessionOutcome::Completed(response)
            }
            Err(error) => {
                let conversation_id = self.conversation_id.clone().unwrap_or_default();
                let decision = self.options.fallback.decide(
                    error,
                    &self.accumulated,
                    &conversation_id,
                    self.transport,
                );
                self.tasks.clear();
                match decision {
                    FallbackDecision::Degrade(response) => {
                        self.transition(SessionStatus::Degraded);
                        observer.on_complete(&response);
                        SessionOutcome::Degraded(response)
                    }
                    FallbackDecision::Fail(error) => {
                        tracing::error!(code = error.error_code(), "Session failed: {}", error);
                        self.transition(SessionStatus::Failed);
                        observer.on_error(&error);
                        SessionOutcome::Failed(error)
                    }
                    FallbackDecision::Silent => {
                        self.transition(SessionStatus::Cancelled);
                        SessionOutcome::Cancelled
                    }
                }
            }
        }
    }

    /// Open a transport per the strategy and read it to a `done` frame.
    async fn drive<O>(
        &mut self,
        request: &StreamRequest,
        observer: &mut O,
    ) -> Result<ChatResponse, StreamError>
    where
        O: StreamObserver + ?Sized,
    {
        let mut mode = self.options.strategy.primary();

        loop {
            let opened = self.negotiator.open(request, mode).await;
            let mut transport = match opened {
                Ok(transport) => transport,
                Err(error) => match self.options.strategy.next_after(mode) {
                    Some(next) => {
                        warn!("{} unavailable, falling back to {}: {}", mode, next, error);
                        mode = next;
                        continue;
                    }
                    None => return Err(error),
                },
            };
            self.transport = Some(mode);

            let result = self.read(&mut transport, observer).await;
            transport.close();

            match result {
                Err(StreamError::Transport { message }) if self.status == SessionStatus::Connecting => {
                    match self.options.strategy.next_after(mode) {
                        Some(next) => {
                            warn!("{} failed before any data, falling back to {}: {}", mode, next, message);
                            mode = next;
                        }
                        None => {
                            return Err(StreamError::TransportOpen { mode, message });
                        }
                    }
                }
                Err(StreamError::ConnectionClosed { reason }) if self.status == SessionStatus::Connecting => {
                    match self.options.strategy.next_after(mode) {
                        Some(next) => {
                            warn!("{} closed before any data, falling back to {}", mode, next);
                            mode = next;
                        }
                        None => return Err(StreamError::ConnectionClosed { reason }),
                    }
                }
                other => return other,
            }
        }
    }

    /// Read chunks until a terminal frame or the end of the transport.
    async fn read<O>(
        &mut self,
        transport: &mut OpenedTransport,
        observer: &mut O,
    ) -> Result<ChatResponse, StreamError>
    where
        O: StreamObserver + ?Sized,
    {
        while let Some(item) = transport.source().next().await {
            let raw = item?;
            if self.status == SessionStatus::Connecting {
                self.transition(SessionStatus::Streaming);
            }

            let Some(frame) = self.parser.parse(&raw) else {
                continue;
            };
            if let Some(response) = self.handle_frame(frame, observer).await? {
                return Ok(response);
            }
        }

        Err(StreamError::ConnectionClosed { reason: None })
    }

    /// Apply one frame. Returns the response for a `done` frame.
    async fn handle_frame<O>(
        &mut self,
        frame: EventFrame,
        observer: &mut O,
    ) -> Result<Option<ChatResponse>, StreamError>
    where
        O: StreamObserver + ?Sized,
    {
        debug!(event = frame.event_type_name(), "Frame received");

        let text = match &frame {
            EventFrame::Done(done) => return self.finish(done.clone(), observer).await.map(Some),
            EventFrame::Error {
                message,
                code,
                recoverable: false,
            } => {
                return Err(StreamError::FatalProtocol {
                    code: code.clone(),
                    message: message.clone(),
                });
            }
            EventFrame::Error { message, code, .. } => {
                warn!(code = code.as_deref().unwrap_or(""), "Recoverable backend error: {}", message);
                String::new()
            }
            EventFrame::StreamStart { conversation_id } => {
                info!(conversation_id = %conversation_id, "Stream started");
                self.conversation_id = Some(conversation_id.clone());
                String::new()
            }
            EventFrame::Token { content, delta } => self.fold_token(content, delta.as_deref()),
            EventFrame::FunctionCall { .. }
            | EventFrame::ToolResult { .. }
            | EventFrame::AgentTaskStart { .. }
            | EventFrame::AgentTaskProgress { .. }
            | EventFrame::AgentTaskComplete { .. }
            | EventFrame::Metrics(_) => String::new(),
        };

        let update = self.tasks.apply(&frame);
        observer.on_chunk(&StreamingChunk {
            frame,
            text,
            accumulated: self.accumulated.clone(),
            synthetic: false,
        });
        if let Some(update) = update {
            observer.on_agent_task(&update.task_id, &update.status, update.progress);
        }

        Ok(None)
    }

    /// Fold token text into the accumulated response and return what it added.
    ///
    /// With `cumulative_tokens` set, `content` that strictly extends the
    /// accumulated text is a cumulative snapshot and replaces it; any other
    /// `content` is appended. An increment that starts with the whole text
    /// so far is indistinguishable from a snapshot and is folded as one
    /// ("a" then "ab" gives "ab"). `delta` is only used when `content` is
    /// empty.
    fn fold_token(&mut self, content: &str, delta: Option<&str>) -> String {
        if !content.is_empty() {
            if self.options.cumulative_tokens
                && content.len() > self.accumulated.len()
                && !self.accumulated.is_empty()
                && content.starts_with(self.accumulated.as_str())
            {
                let added = content[self.accumulated.len()..].to_string();
                self.accumulated = content.to_string();
                return added;
            }
            self.accumulated.push_str(content);
            return content.to_string();
        }

        match delta {
            Some(delta) => {
                self.accumulated.push_str(delta);
                delta.to_string()
            }
            None => String::new(),
        }
    }

    /// Build the final response, re-emitting a whole response first if it
    /// arrived without any streamed text.
    async fn finish<O>(&mut self, done: DoneEvent, observer: &mut O) -> Result<ChatResponse, StreamError>
    where
        O: StreamObserver + ?Sized,
    {
        if let Some(conversation_id) = &done.conversation_id {
            self.conversation_id = Some(conversation_id.clone());
        }

        let chunking = self.options.chunking;
        if self.accumulated.is_empty() {
            if let Some(text) = done.final_response.as_deref().filter(|t| chunking.applies_to(t)) {
                debug!(chars = text.len(), "Re-emitting whole response as tokens");
                for piece in ResponseChunker::new(text, chunking.chunk_size) {
                    self.accumulated.push_str(piece);
                    observer.on_chunk(&StreamingChunk {
                        frame: EventFrame::token(piece),
                        text: piece.to_string(),
                        accumulated: self.accumulated.clone(),
                        synthetic: true,
                    });
                    chunking.pace().await;
                }
            }
        }

        self.tasks.clear();
        let conversation_id = self.conversation_id.clone().unwrap_or_default();
        Ok(ChatResponse::from_done(
            done,
            &self.accumulated,
            &conversation_id,
            self.transport,
        ))
    }

    fn transition(&mut self, next: SessionStatus) {
        if self.status.can_transition_to(next) {
            debug!(from = %self.status, to = %next, "Session status");
            self.status = next;
        }
    }
}

fn abort_error(reason: AbortReason, timeout: Duration) -> StreamError {
    match reason {
        AbortReason::Cancelled => StreamError::Cancelled,
        AbortReason::Timeout => StreamError::Timeout {
            duration_ms: timeout.as_millis() as u64,
        },
    }
}
