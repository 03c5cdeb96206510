//! WebSocket client for the chat fallback transport.
//!
//! A chat socket is one-shot: connect, send the auth frame, send the chat
//! frame, then read event frames until the server finishes or hangs up.

pub mod client;
pub mod messages;

pub use client::{WsClient, WsConnectionState, WsError};
pub use messages::{WsAuth, WsChat, WsOutgoingMessage};
