//! Result type alias for client operations.

use super::client_error::ClientError;

/// Type alias for Results using ClientError.
///
/// ```ignore
/// use chatstream::error::ClientResult;
///
/// async fn ping(client: &ChatClient) -> ClientResult<bool> {
///     client.health_check().await
/// }
/// ```
pub type ClientResult<T> = Result<T, ClientError>;
