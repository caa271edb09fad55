//! kvsrtc Signal
//!
//! Wire layer for the Kinesis Video Streams WebRTC signaling service.
//!
//! This crate provides:
//! - Session state shared across calls ([`SignalContext`], [`SignalConfig`])
//! - Request builders rendering URL + JSON body into caller buffers ([`request`])
//! - Response parsers borrowing from the response body ([`response`])
//! - The shared ICE server list parser ([`ice`])
//! - The WebSocket message codec ([`wss`])
//!
//! Nothing here performs I/O. Parsed structs borrow from the input buffer, so
//! the buffer must outlive them; the lifetime parameters enforce it.
//!
//! A [`SignalContext`] is plain mutable state with no internal locking. Calls
//! that read or update it take `&mut SignalContext`, so one session's calls
//! are serialized by the borrow checker.

pub mod config;
pub mod context;
pub mod error;
pub mod ice;
pub mod json;
pub mod request;
pub mod response;
pub mod types;
pub mod wss;

pub use config::SignalConfig;
pub use context::SignalContext;
pub use error::{Result, SignalError};
pub use request::SignalRequest;
pub use types::*;

/// Region used when none is configured
pub const AWS_DEFAULT_REGION: &str = "us-west-2";

/// Control plane URL pieces: `https://kinesisvideo.{region}.amazonaws.com`
pub const AWS_CONTROL_PLANE_URI_PREFIX: &str = "https://";
pub const AWS_KINESIS_VIDEO_SERVICE_NAME: &str = "kinesisvideo";
pub const AWS_CONTROL_PLANE_URI_POSTFIX: &str = ".amazonaws.com";

pub const AWS_REGION_MAX_LENGTH: usize = 50;
pub const AWS_CONTROL_PLANE_URL_MAX_LENGTH: usize = 256;
pub const AWS_SIGNALING_CLIENT_ID_MAX_LENGTH: usize = 256;
pub const AWS_MAX_ARN_LEN: usize = 1024;
pub const AWS_MAX_CHANNEL_NAME_LEN: usize = 256;

/// Maximum ICE servers kept from one list
pub const AWS_ICE_SERVER_MAX_NUM: usize = 5;

/// Maximum URIs per ICE server
pub const AWS_ICE_SERVER_MAX_URIS: usize = 4;

/// Channel message TTL: digits accepted and valid range in seconds
pub const AWS_MESSAGE_CHANNEL_TTL_SECONDS_BUFFER_MAX: usize = 5;
pub const AWS_MESSAGE_CHANNEL_TTL_SECONDS_MIN: u32 = 5;
pub const AWS_MESSAGE_CHANNEL_TTL_SECONDS_MAX: u32 = 120;

/// ICE server credential TTL: digits accepted and valid range in seconds
pub const AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_BUFFER_MAX: usize = 7;
pub const AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_MIN: u32 = 30;
pub const AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_MAX: u32 = 86400;

/// Fallback wire string for enum values with no mapping.
///
/// The spelling matches what deployed clients send; do not correct it.
pub const SIGNAL_STRING_UNKNOWN: &str = "UNKOWN";
