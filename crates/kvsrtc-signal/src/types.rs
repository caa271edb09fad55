//! Signaling request/response types
//!
//! Request structs borrow their inputs from the caller; response structs
//! borrow from the JSON buffer they were parsed from. Optional wire fields
//! are `Option<&str>` and stay `None` when the key is absent.

use std::ops::BitOr;

use serde::Serialize;

use crate::SIGNAL_STRING_UNKNOWN;

pub const SIGNAL_STRING_SINGLE_MASTER: &str = "SINGLE_MASTER";
pub const SIGNAL_STRING_MASTER: &str = "MASTER";
pub const SIGNAL_STRING_VIEWER: &str = "VIEWER";

// ============================================================================
// ENUMS
// ============================================================================

/// Signaling channel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChannelType {
    #[default]
    Unknown,
    SingleMaster,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::SingleMaster => SIGNAL_STRING_SINGLE_MASTER,
            ChannelType::Unknown => SIGNAL_STRING_UNKNOWN,
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        (s == SIGNAL_STRING_SINGLE_MASTER).then_some(ChannelType::SingleMaster)
    }
}

/// Which side of the channel a client plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Role {
    #[default]
    Unknown,
    Master,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Master => SIGNAL_STRING_MASTER,
            Role::Viewer => SIGNAL_STRING_VIEWER,
            Role::Unknown => SIGNAL_STRING_UNKNOWN,
        }
    }
}

/// Set of endpoint protocols requested from `GetSignalingChannelEndpoint`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EndpointProtocols(u8);

impl EndpointProtocols {
    pub const NONE: Self = Self(0);
    pub const WSS: Self = Self(1);
    pub const HTTPS: Self = Self(2);
    pub const WEBRTC: Self = Self(4);

    /// Wire names in the order they are always rendered
    pub const ORDERED: [(Self, &'static str); 3] = [
        (Self::WSS, "WSS"),
        (Self::HTTPS, "HTTPS"),
        (Self::WEBRTC, "WEBRTC"),
    ];

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EndpointProtocols {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// WebSocket message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MessageType {
    #[default]
    Unknown,
    SdpOffer,
    SdpAnswer,
    IceCandidate,
    GoAway,
    ReconnectIceServer,
    StatusResponse,
}

impl MessageType {
    /// Value of the outbound `action` field
    ///
    /// Only offers, answers and candidates are ever sent by a client.
    pub fn as_action(&self) -> &'static str {
        match self {
            MessageType::SdpOffer => "SDP_OFFER",
            MessageType::SdpAnswer => "SDP_ANSWER",
            MessageType::IceCandidate => "ICE_CANDIDATE",
            _ => SIGNAL_STRING_UNKNOWN,
        }
    }

    /// Map an inbound `messageType` value; unrecognized values are `Unknown`
    pub fn from_wire(s: &str) -> Self {
        match s {
            "SDP_OFFER" => MessageType::SdpOffer,
            "SDP_ANSWER" => MessageType::SdpAnswer,
            "ICE_CANDIDATE" => MessageType::IceCandidate,
            "GO_AWAY" => MessageType::GoAway,
            "RECONNECT_ICE_SERVER" => MessageType::ReconnectIceServer,
            "STATUS_RESPONSE" => MessageType::StatusResponse,
            _ => MessageType::Unknown,
        }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

/// `DescribeSignalingChannel`; the name falls back to the context
#[derive(Debug, Clone, Copy, Default)]
pub struct DescribeChannelRequest<'a> {
    pub channel_name: Option<&'a str>,
}

/// `DescribeMediaStorageConfiguration`; the ARN falls back to the context
#[derive(Debug, Clone, Copy, Default)]
pub struct DescribeMediaStorageConfigRequest<'a> {
    pub channel_arn: Option<&'a str>,
}

/// A resource tag attached at channel creation
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// `CreateSignalingChannel`
#[derive(Debug, Clone, Copy)]
pub struct CreateChannelRequest<'a> {
    pub channel_name: &'a str,
    pub channel_type: ChannelType,
    pub message_ttl_seconds: u32,
    pub tags: &'a [Tag<'a>],
}

/// `GetSignalingChannelEndpoint`; the ARN falls back to the context
#[derive(Debug, Clone, Copy, Default)]
pub struct GetChannelEndpointRequest<'a> {
    pub channel_arn: Option<&'a str>,
    pub protocols: EndpointProtocols,
    pub role: Role,
}

/// `GetIceServerConfig`; every field falls back to the context
#[derive(Debug, Clone, Copy, Default)]
pub struct GetIceServerConfigRequest<'a> {
    pub channel_arn: Option<&'a str>,
    pub endpoint_https: Option<&'a str>,
    pub client_id: Option<&'a str>,
}

/// `JoinStorageSession`
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinStorageSessionRequest<'a> {
    pub endpoint_webrtc: &'a str,
    pub channel_arn: Option<&'a str>,
    pub role: Role,
    /// Required for viewers, ignored for masters
    pub client_id: Option<&'a str>,
}

/// `DeleteSignalingChannel`
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteChannelRequest<'a> {
    pub channel_arn: Option<&'a str>,
    /// `Version` from a prior describe call
    pub version: &'a str,
}

/// Secure WebSocket connect URL
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectWssEndpointRequest<'a> {
    pub endpoint_wss: &'a str,
    pub channel_arn: Option<&'a str>,
    pub role: Role,
    /// Required for viewers, ignored for masters
    pub client_id: Option<&'a str>,
}

// ============================================================================
// RESPONSES
// ============================================================================

/// `ChannelInfo` of a `DescribeSignalingChannel` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescribeChannelResponse<'a> {
    pub channel_arn: Option<&'a str>,
    pub channel_name: Option<&'a str>,
    pub channel_status: Option<&'a str>,
    pub channel_type: ChannelType,
    pub version: Option<&'a str>,
    pub creation_time: Option<&'a str>,
    pub message_ttl_seconds: Option<u32>,
}

/// `CreateSignalingChannel` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateChannelResponse<'a> {
    pub channel_arn: Option<&'a str>,
}

/// `MediaStorageConfiguration` of a `DescribeMediaStorageConfiguration` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescribeMediaStorageConfigResponse<'a> {
    pub status: Option<&'a str>,
    pub stream_arn: Option<&'a str>,
}

/// Endpoints from a `GetSignalingChannelEndpoint` response, one slot per protocol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetChannelEndpointResponse<'a> {
    pub endpoint_wss: Option<&'a str>,
    pub endpoint_https: Option<&'a str>,
    pub endpoint_webrtc: Option<&'a str>,
}

/// A STUN/TURN server with its temporary credentials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IceServer<'a> {
    pub password: Option<&'a str>,
    pub ttl_seconds: u32,
    pub uris: Vec<&'a str>,
    pub username: Option<&'a str>,
}

/// Up to [`AWS_ICE_SERVER_MAX_NUM`](crate::AWS_ICE_SERVER_MAX_NUM) ICE servers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IceServerList<'a> {
    pub servers: Vec<IceServer<'a>>,
}

impl<'a> IceServerList<'a> {
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

/// Outbound WebSocket message
#[derive(Debug, Clone, Default)]
pub struct WssSendMessage<'a> {
    pub message_type: MessageType,
    pub recipient_client_id: &'a str,
    /// Base64 of the SDP or candidate JSON, passed through untouched
    pub base64_payload: &'a str,
    pub correlation_id: Option<&'a str>,
    /// Only rendered for [`MessageType::SdpOffer`]
    pub ice_server_list: IceServerList<'a>,
}

/// `statusResponse` of an inbound message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WssStatusResponse<'a> {
    pub correlation_id: Option<&'a str>,
    pub error_type: Option<&'a str>,
    pub status_code: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Inbound WebSocket message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WssRecvMessage<'a> {
    pub sender_client_id: Option<&'a str>,
    pub message_type: MessageType,
    pub base64_payload: Option<&'a str>,
    pub status_response: Option<WssStatusResponse<'a>>,
    pub ice_server_list: IceServerList<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_bits() {
        let protocols = EndpointProtocols::WSS | EndpointProtocols::WEBRTC;
        assert_eq!(protocols.bits(), 5);
        assert!(protocols.contains(EndpointProtocols::WSS));
        assert!(!protocols.contains(EndpointProtocols::HTTPS));
        assert!(!protocols.contains(EndpointProtocols::NONE));
    }

    #[test]
    fn test_unknown_spelling_preserved() {
        assert_eq!(MessageType::GoAway.as_action(), "UNKOWN");
        assert_eq!(Role::Unknown.as_str(), "UNKOWN");
        assert_eq!(ChannelType::Unknown.as_str(), "UNKOWN");
    }

    #[test]
    fn test_message_type_from_wire() {
        assert_eq!(MessageType::from_wire("RECONNECT_ICE_SERVER"), MessageType::ReconnectIceServer);
        assert_eq!(MessageType::from_wire("sdp_offer"), MessageType::Unknown);
    }
}
