//! Error types for bounded writes

use thiserror::Error;

/// Result type alias for bounded writes
pub type Result<T> = std::result::Result<T, CapacityError>;

/// A write did not fit in the destination buffer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("buffer too small: need {needed} bytes, have {capacity}")]
pub struct CapacityError {
    /// Bytes the rendered output needed, including any reserved slot
    pub needed: usize,
    /// Size of the destination buffer
    pub capacity: usize,
}
