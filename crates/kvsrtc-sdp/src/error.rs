//! Error types for SDP parsing and rendering

use kvsrtc_core::CapacityError;
use thiserror::Error;

/// Result type alias for SDP operations
pub type Result<T> = std::result::Result<T, SdpError>;

/// SDP error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdpError {
    /// A line could not be tokenized or a typed field did not parse
    #[error("malformed sdp at line {line}: {reason}")]
    MalformedSdp { line: usize, reason: String },

    /// A session or media block already holds the maximum number of attributes
    #[error("attribute limit of {0} exceeded")]
    AttributeMaxExceeded(usize),

    /// A bounded sequence, text field or the output buffer is full
    #[error("buffer too small: need {needed}, have {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    /// The model holds a value the wire format cannot express
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl SdpError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        SdpError::MalformedSdp {
            line,
            reason: reason.into(),
        }
    }
}

impl From<CapacityError> for SdpError {
    fn from(e: CapacityError) -> Self {
        SdpError::BufferTooSmall {
            needed: e.needed,
            capacity: e.capacity,
        }
    }
}
