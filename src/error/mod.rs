//! Error handling for the chat client.
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - **Domain errors**: `StreamError` for sessions, `NetworkError` for HTTP
//! - **Unified error**: `ClientError` for the non-streaming surface
//! - **Result alias**: `ClientResult<T>`
//!
//! # Error Categories
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout | Yes |
//! | Server | Backend errors (5xx, fatal `error` frames) | Yes |
//! | Protocol | Undecodable responses | No |
//! | Client | Misuse, 4xx | No |
//! | Cancelled | Caller stopped the operation | No |
//! | Configuration | Config issues | No |

mod category;
mod client_error;
mod network;
mod result;
mod stream;

pub use category::ErrorCategory;
pub use client_error::ClientError;
pub use network::{classify_reqwest_error, NetworkError};
pub use result::ClientResult;
pub use stream::StreamError;
