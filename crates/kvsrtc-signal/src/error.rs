//! Signaling error types

use kvsrtc_core::CapacityError;
use thiserror::Error;

/// Result type alias for signaling operations
pub type Result<T> = std::result::Result<T, SignalError>;

/// Signaling error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// A required input is missing or empty
    #[error("bad parameter: {0}")]
    BadParam(&'static str),

    /// A rendered URL or body does not fit its buffer
    #[error("out of memory: need {needed} bytes, have {capacity}")]
    OutOfMemory { needed: usize, capacity: usize },

    /// The input is not well-formed JSON
    #[error("invalid json: {0}")]
    InvalidJson(String),

    /// Well-formed JSON that does not have the shape of the expected API response
    #[error("unexpected response: {0}")]
    NotExpectedResponse(String),

    /// A TTL is non-numeric, too long or out of range
    #[error("invalid ttl: {0}")]
    InvalidTtl(String),

    /// An endpoint URL is empty or too long
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A channel name is empty or too long
    #[error("invalid channel name (length {0})")]
    InvalidChannelName(usize),

    /// `ChannelType` is anything other than `SINGLE_MASTER`
    #[error("invalid channel type: {0}")]
    InvalidChannelType(String),

    /// More ICE servers than an outbound message can carry
    #[error("too many ice servers: {0}")]
    InvalidIceServerCount(usize),

    /// More URIs on one ICE server than the list can hold
    #[error("too many ice server uris: {0}")]
    InvalidIceServerUrisCount(usize),

    /// A `statusResponse` member has the wrong JSON type
    #[error("invalid status response: {0}")]
    InvalidStatusResponse(String),
}

impl From<CapacityError> for SignalError {
    fn from(e: CapacityError) -> Self {
        SignalError::OutOfMemory {
            needed: e.needed,
            capacity: e.capacity,
        }
    }
}

impl From<serde_json::Error> for SignalError {
    fn from(e: serde_json::Error) -> Self {
        SignalError::InvalidJson(e.to_string())
    }
}
