//! chatstream - streaming chat transport client
//!
//! Streams one chat turn over Server-Sent Events, falling back once to a
//! WebSocket channel when SSE cannot be established. Every inbound frame is
//! normalized into an [`EventFrame`](protocol::EventFrame); a
//! [`StreamSession`](session::StreamSession) folds them into a
//! [`ChatResponse`](models::ChatResponse) under one deadline, tracks remote
//! agent tasks and degrades to a fallback response instead of failing
//! where it can.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod models;
pub mod protocol;
pub mod session;
pub mod state;
pub mod traits;
pub mod transport;
pub mod websocket;

pub use client::ChatClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, StreamError};
pub use models::{AgentOverride, ChatResponse, StreamRequest};
pub use protocol::{EventFrame, FrameParser};
pub use session::{SessionOutcome, SessionStatus, StreamObserver, StreamSession, StreamingChunk};
pub use transport::{TransportMode, TransportStrategy};
