//! Response parsers
//!
//! Every parser follows the same steps: validate the body as JSON, find the
//! expected top-level member with the expected kind, then walk its members
//! by exact key, ignoring keys it does not know. Returned strings borrow
//! from `body`.

use std::ops::RangeInclusive;

use kvsrtc_core::BoundedWriter;
use tracing::{debug, warn};

use crate::context::{check_channel_name, is_valid_arn};
use crate::ice::parse_ice_server_list;
use crate::json::{self, JsonType, JsonValue};
use crate::types::*;
use crate::{
    Result, SignalContext, SignalError, AWS_MESSAGE_CHANNEL_TTL_SECONDS_BUFFER_MAX,
    AWS_MESSAGE_CHANNEL_TTL_SECONDS_MAX, AWS_MESSAGE_CHANNEL_TTL_SECONDS_MIN,
};

/// Parse a decimal TTL through a `buffer_max`-byte scratch
///
/// The scratch keeps one slot back, so at most `buffer_max - 1` digits are
/// accepted.
pub(crate) fn parse_ttl(text: &str, buffer_max: usize, range: RangeInclusive<u32>) -> Result<u32> {
    let mut scratch = [0u8; 8];
    let scratch = &mut scratch[..buffer_max.min(8)];
    let mut w = BoundedWriter::with_terminator(scratch);
    if w.put_str(text).is_err() {
        return Err(SignalError::InvalidTtl(format!("{:?} is too long", text)));
    }

    let ttl = w
        .as_str()
        .parse::<u32>()
        .map_err(|_| SignalError::InvalidTtl(format!("{:?} is not a number", text)))?;
    if !range.contains(&ttl) {
        warn!(ttl, min = *range.start(), max = *range.end(), "ttl out of range");
        return Err(SignalError::InvalidTtl(format!("{} not in {:?}", ttl, range)));
    }
    Ok(ttl)
}

/// Top-level member `key`, which must exist and be of `kind`
fn expect_member<'a>(root: &JsonValue<'a>, key: &'static str, kind: JsonType) -> Result<JsonValue<'a>> {
    match root.get(key)? {
        Some(value) if value.is(kind) => Ok(value),
        Some(value) => Err(SignalError::NotExpectedResponse(format!(
            "{} is {:?}, expected {:?}",
            key,
            value.kind(),
            kind
        ))),
        None => Err(SignalError::NotExpectedResponse(format!("missing {}", key))),
    }
}

/// Channel ARN as returned by the service
fn check_response_arn(arn: &str) -> Result<()> {
    if !is_valid_arn(arn) {
        return Err(SignalError::NotExpectedResponse(format!(
            "ChannelARN of length {}",
            arn.len()
        )));
    }
    Ok(())
}

/// `DescribeSignalingChannel` response, `ChannelInfo` object
///
/// Records the channel ARN, name, type and message TTL in the context. Every
/// field is validated first; on error the context is left untouched. The
/// channel type is only recorded when the response carries one.
pub fn parse_describe_channel<'a>(
    ctx: &mut SignalContext,
    body: &'a [u8],
) -> Result<DescribeChannelResponse<'a>> {
    let root = json::parse_bytes(body)?;
    let info = expect_member(&root, "ChannelInfo", JsonType::Object)?;

    let mut response = DescribeChannelResponse::default();
    let mut channel_type = None;
    for pair in info.pairs()? {
        match pair.key.as_ref() {
            "ChannelARN" => response.channel_arn = Some(pair.value.text()),
            "ChannelName" => response.channel_name = Some(pair.value.text()),
            "ChannelStatus" => response.channel_status = Some(pair.value.text()),
            "ChannelType" => {
                let text = pair.value.text();
                let parsed = ChannelType::from_wire(text)
                    .ok_or_else(|| SignalError::InvalidChannelType(text.to_string()))?;
                response.channel_type = parsed;
                channel_type = Some(parsed);
            }
            "CreationTime" => response.creation_time = Some(pair.value.text()),
            "Version" => response.version = Some(pair.value.text()),
            "SingleMasterConfiguration" => {
                if let Some(ttl) = pair.value.get("MessageTtlSeconds")? {
                    response.message_ttl_seconds = Some(parse_ttl(
                        ttl.text(),
                        AWS_MESSAGE_CHANNEL_TTL_SECONDS_BUFFER_MAX,
                        AWS_MESSAGE_CHANNEL_TTL_SECONDS_MIN..=AWS_MESSAGE_CHANNEL_TTL_SECONDS_MAX,
                    )?);
                }
            }
            _ => {}
        }
    }

    if let Some(arn) = response.channel_arn {
        check_response_arn(arn)?;
    }
    if let Some(name) = response.channel_name {
        check_channel_name(name)?;
    }

    if let Some(arn) = response.channel_arn {
        ctx.set_channel_arn(arn)?;
    }
    if let Some(name) = response.channel_name {
        ctx.set_channel_name(name)?;
    }
    if let Some(channel_type) = channel_type {
        ctx.set_channel_type(channel_type);
    }
    if let Some(ttl) = response.message_ttl_seconds {
        ctx.set_message_ttl_seconds(ttl);
    }

    debug!(arn = ?response.channel_arn, status = ?response.channel_status, "parsed describeSignalingChannel");
    Ok(response)
}

/// `CreateSignalingChannel` response
///
/// Records the new channel's ARN in the context.
pub fn parse_create_channel<'a>(
    ctx: &mut SignalContext,
    body: &'a [u8],
) -> Result<CreateChannelResponse<'a>> {
    let root = json::parse_bytes(body)?;
    let arn = expect_member(&root, "ChannelARN", JsonType::String)?.text();
    check_response_arn(arn)?;
    ctx.set_channel_arn(arn)?;

    debug!(%arn, "parsed createSignalingChannel");
    Ok(CreateChannelResponse { channel_arn: Some(arn) })
}

/// `DescribeMediaStorageConfiguration` response, `MediaStorageConfiguration` object
pub fn parse_describe_media_storage_config(body: &[u8]) -> Result<DescribeMediaStorageConfigResponse<'_>> {
    let root = json::parse_bytes(body)?;
    let config = expect_member(&root, "MediaStorageConfiguration", JsonType::Object)?;

    let mut response = DescribeMediaStorageConfigResponse::default();
    for pair in config.pairs()? {
        match pair.key.as_ref() {
            "Status" => response.status = Some(pair.value.text()),
            "StreamARN" => response.stream_arn = Some(pair.value.text()),
            _ => {}
        }
    }

    debug!(status = ?response.status, "parsed describeMediaStorageConfiguration");
    Ok(response)
}

/// `GetSignalingChannelEndpoint` response, `ResourceEndpointList` array
///
/// Protocol names match case-insensitively. Entries with an unknown
/// protocol or without a `ResourceEndpoint` are dropped. Records the HTTPS
/// endpoint in the context.
pub fn parse_get_channel_endpoint<'a>(
    ctx: &mut SignalContext,
    body: &'a [u8],
) -> Result<GetChannelEndpointResponse<'a>> {
    let root = json::parse_bytes(body)?;
    let list = expect_member(&root, "ResourceEndpointList", JsonType::Array)?;

    let mut response = GetChannelEndpointResponse::default();
    for entry in list.elements()? {
        if !entry.is(JsonType::Object) {
            continue;
        }

        let mut protocol = None;
        let mut endpoint = None;
        for pair in entry.pairs()? {
            match pair.key.as_ref() {
                "Protocol" => protocol = Some(pair.value.text()),
                "ResourceEndpoint" => endpoint = Some(pair.value.text()),
                _ => {}
            }
        }

        let (Some(protocol), Some(endpoint)) = (protocol, endpoint) else {
            debug!(?protocol, "dropping endpoint entry without protocol or endpoint");
            continue;
        };

        let slot = if protocol.eq_ignore_ascii_case("WSS") {
            &mut response.endpoint_wss
        } else if protocol.eq_ignore_ascii_case("HTTPS") {
            &mut response.endpoint_https
        } else if protocol.eq_ignore_ascii_case("WEBRTC") {
            &mut response.endpoint_webrtc
        } else {
            debug!(%protocol, "dropping endpoint with unknown protocol");
            continue;
        };
        *slot = Some(endpoint);
    }

    if let Some(endpoint) = response.endpoint_https {
        ctx.set_channel_endpoint_https(endpoint)?;
    }

    debug!(
        wss = response.endpoint_wss.is_some(),
        https = response.endpoint_https.is_some(),
        webrtc = response.endpoint_webrtc.is_some(),
        "parsed getSignalingChannelEndpoint"
    );
    Ok(response)
}

/// `GetIceServerConfig` response, `IceServerList` array
pub fn parse_get_ice_server_config(body: &[u8]) -> Result<IceServerList<'_>> {
    let root = json::parse_bytes(body)?;
    let list = expect_member(&root, "IceServerList", JsonType::Array)?;
    parse_ice_server_list(list)
}
