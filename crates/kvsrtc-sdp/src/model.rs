//! In-memory session description
//!
//! Sequences are growable but capped: the `push_*`/`add_*` helpers refuse to
//! go past the limits below, so a model built through them always fits the
//! fixed-capacity representation used on the wire side.

use serde::Serialize;

use crate::{Result, SdpError};

/// Maximum media blocks (`m=` lines) in one session
pub const MAX_SDP_SESSION_MEDIA_COUNT: usize = 5;

/// Maximum attributes per session and per media block
pub const MAX_SDP_ATTRIBUTES_COUNT: usize = 256;

/// Maximum time descriptions (`t=` lines) in one session
pub const MAX_SDP_SESSION_TIME_DESCRIPTION_COUNT: usize = 2;

pub const MAX_SDP_SESSION_USERNAME_LENGTH: usize = 32;
pub const MAX_SDP_SESSION_NAME_LENGTH: usize = 255;
pub const MAX_SDP_SESSION_INFORMATION_LENGTH: usize = 255;
pub const MAX_SDP_SESSION_URI_LENGTH: usize = 255;
pub const MAX_SDP_SESSION_EMAIL_ADDRESS_LENGTH: usize = 255;
pub const MAX_SDP_SESSION_PHONE_NUMBER_LENGTH: usize = 255;
pub const MAX_SDP_NETWORK_TYPE_LENGTH: usize = 5;
pub const MAX_SDP_ADDRESS_TYPE_LENGTH: usize = 5;
pub const MAX_SDP_CONNECTION_ADDRESS_LENGTH: usize = 255;
pub const MAX_SDP_MEDIA_NAME_LENGTH: usize = 255;
pub const MAX_SDP_MEDIA_TITLE_LENGTH: usize = 255;
pub const MAX_SDP_ATTRIBUTE_NAME_LENGTH: usize = 256;
pub const MAX_SDP_ATTRIBUTE_VALUE_LENGTH: usize = 2048;

/// The only network type SDP defines
pub const NETWORK_TYPE_IN: &str = "IN";
pub const ADDRESS_TYPE_IP4: &str = "IP4";
pub const ADDRESS_TYPE_IP6: &str = "IP6";

/// Copy `value` into an owned field, refusing text longer than `max`
pub(crate) fn bounded_text(value: &str, max: usize) -> Result<String> {
    if value.len() > max {
        return Err(SdpError::BufferTooSmall {
            needed: value.len(),
            capacity: max,
        });
    }
    Ok(value.to_string())
}

/// `c=` line contents, also embedded in the origin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionInformation {
    pub network_type: String,
    pub address_type: String,
    pub connection_address: String,
}

impl ConnectionInformation {
    pub fn new(
        network_type: impl Into<String>,
        address_type: impl Into<String>,
        connection_address: impl Into<String>,
    ) -> Self {
        Self {
            network_type: network_type.into(),
            address_type: address_type.into(),
            connection_address: connection_address.into(),
        }
    }

    /// An all-empty connection is not written out
    pub fn is_empty(&self) -> bool {
        self.network_type.is_empty()
    }
}

/// `o=` line contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SdpOrigin {
    pub user_name: String,
    pub session_id: u64,
    pub session_version: u64,
    pub connection: ConnectionInformation,
}

/// `t=` line contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeDescription {
    pub start_time: u64,
    pub stop_time: u64,
}

/// `a=` line, either a property (`a=sendrecv`) or a value (`a=mid:0`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SdpAttribute {
    pub name: String,
    pub value: Option<String>,
}

impl SdpAttribute {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }

    /// Build an attribute while enforcing the name/value length limits
    pub fn bounded(name: &str, value: Option<&str>) -> Result<Self> {
        Ok(Self {
            name: bounded_text(name, MAX_SDP_ATTRIBUTE_NAME_LENGTH)?,
            value: value
                .map(|v| bounded_text(v, MAX_SDP_ATTRIBUTE_VALUE_LENGTH))
                .transpose()?,
        })
    }
}

fn push_attribute(attributes: &mut Vec<SdpAttribute>, attribute: SdpAttribute) -> Result<()> {
    if attributes.len() >= MAX_SDP_ATTRIBUTES_COUNT {
        return Err(SdpError::AttributeMaxExceeded(MAX_SDP_ATTRIBUTES_COUNT));
    }
    attributes.push(attribute);
    Ok(())
}

/// One `m=` block and the lines scoped to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaDescription {
    /// Everything after `m=`, e.g. `audio 9 UDP/TLS/RTP/SAVPF 111`
    pub media_name: String,
    /// Media-level `i=`
    pub media_title: String,
    pub connection: ConnectionInformation,
    pub attributes: Vec<SdpAttribute>,
}

impl MediaDescription {
    pub fn new(media_name: impl Into<String>) -> Self {
        Self {
            media_name: media_name.into(),
            ..Default::default()
        }
    }

    /// Append a media attribute, failing once the block is full
    pub fn add_attribute(&mut self, attribute: SdpAttribute) -> Result<()> {
        push_attribute(&mut self.attributes, attribute)
    }

    /// Look up the first attribute with the given name
    pub fn attribute(&self, name: &str) -> Option<&SdpAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A complete SDP session description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionDescription {
    pub version: u64,
    pub origin: SdpOrigin,
    pub session_name: String,
    pub session_information: String,
    pub uri: String,
    pub email_address: String,
    pub phone_number: String,
    /// Session-level `c=`
    pub connection: ConnectionInformation,
    pub time_descriptions: Vec<TimeDescription>,
    pub attributes: Vec<SdpAttribute>,
    pub media_descriptions: Vec<MediaDescription>,
}

impl SessionDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a session attribute, failing once the session is full
    pub fn add_attribute(&mut self, attribute: SdpAttribute) -> Result<()> {
        push_attribute(&mut self.attributes, attribute)
    }

    /// Append a time description
    pub fn add_time_description(&mut self, time: TimeDescription) -> Result<()> {
        if self.time_descriptions.len() >= MAX_SDP_SESSION_TIME_DESCRIPTION_COUNT {
            return Err(SdpError::BufferTooSmall {
                needed: self.time_descriptions.len() + 1,
                capacity: MAX_SDP_SESSION_TIME_DESCRIPTION_COUNT,
            });
        }
        self.time_descriptions.push(time);
        Ok(())
    }

    /// Open a new media block and return it for further population
    pub fn add_media(&mut self, media: MediaDescription) -> Result<&mut MediaDescription> {
        if self.media_descriptions.len() >= MAX_SDP_SESSION_MEDIA_COUNT {
            return Err(SdpError::BufferTooSmall {
                needed: self.media_descriptions.len() + 1,
                capacity: MAX_SDP_SESSION_MEDIA_COUNT,
            });
        }
        self.media_descriptions.push(media);
        let last = self.media_descriptions.len() - 1;
        Ok(&mut self.media_descriptions[last])
    }

    /// Look up the first session attribute with the given name
    pub fn attribute(&self, name: &str) -> Option<&SdpAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
