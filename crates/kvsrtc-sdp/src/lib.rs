//! kvsrtc SDP
//!
//! Session Description Protocol (RFC 4566) codec for WebRTC offers and answers.
//!
//! This crate provides:
//! - The session model ([`SessionDescription`], [`MediaDescription`], [`SdpAttribute`])
//! - A line tokenizer ([`SdpTokenizer`]) and attribute splitter ([`parse_attribute`])
//! - [`deserialize`]: SDP text → model, single pass, capacity checked
//! - [`serialize`]: model → SDP text in a caller buffer
//!
//! ```
//! use kvsrtc_sdp::{deserialize, serialize};
//!
//! let offer = "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\nm=audio 9 RTP/AVP 0\r\na=sendrecv\r\n";
//! let session = deserialize(offer).unwrap();
//! assert_eq!(session.media_descriptions[0].attributes[0].name, "sendrecv");
//!
//! let mut buf = [0u8; 256];
//! let len = serialize(&session, &mut buf).unwrap();
//! assert_eq!(&buf[..len], offer.as_bytes());
//! ```

pub mod deserialize;
pub mod error;
pub mod model;
pub mod serialize;
pub mod tokenizer;

pub use deserialize::deserialize;
pub use error::{Result, SdpError};
pub use model::{
    ConnectionInformation, MediaDescription, SdpAttribute, SdpOrigin, SessionDescription,
    TimeDescription, MAX_SDP_ATTRIBUTES_COUNT, MAX_SDP_SESSION_MEDIA_COUNT,
    MAX_SDP_SESSION_TIME_DESCRIPTION_COUNT,
};
pub use serialize::serialize;
pub use tokenizer::{parse_attribute, AttributeRef, SdpLine, SdpTokenizer};
