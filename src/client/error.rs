//! Remote call error types
//!
//! Every request/response exchange with the remote index fails with a
//! [`RemoteCallError`]. The gallery and tag stores catch these at the call
//! site, log them and hand them back as values; nothing here is retried.

use thiserror::Error;

/// Failure of a single remote call
#[derive(Debug, Error)]
pub enum RemoteCallError {
    /// The request never produced a response (connection, timeout, bad endpoint)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote side answered with a failure
    #[error("Remote error: {0}")]
    Remote(String),

    /// Arguments could not be encoded for the wire
    #[error("Failed to encode arguments for {command}: {reason}")]
    Encode { command: String, reason: String },

    /// The response did not have the expected shape
    #[error("Failed to decode response of {command}: {reason}")]
    Decode { command: String, reason: String },
}
