//! Request builders
//!
//! One function per signaling API. Each builder validates its inputs,
//! renders the URL and JSON body into the caller's [`SignalRequest`] buffers,
//! and only then records the fields it used in the [`SignalContext`]. A
//! failed call leaves the context untouched.
//!
//! Both buffers are written with a reserved terminator slot: a rendering of
//! exactly `capacity` bytes fails with [`SignalError::OutOfMemory`].
//!
//! String inputs are inserted into the JSON templates verbatim. Channel
//! names, ARNs, client ids and tags are restricted by the service to
//! characters that need no escaping.

use kvsrtc_core::BoundedWriter;
use tracing::debug;

use crate::context::{check_channel_name, check_endpoint, is_valid_arn};
use crate::types::*;
use crate::{
    Result, SignalContext, SignalError, AWS_MESSAGE_CHANNEL_TTL_SECONDS_MAX, AWS_MESSAGE_CHANNEL_TTL_SECONDS_MIN,
    AWS_SIGNALING_CLIENT_ID_MAX_LENGTH,
};

pub const AWS_DESCRIBE_SIGNALING_CHANNEL_API_POSTFIX: &str = "/describeSignalingChannel";
pub const AWS_DESCRIBE_MEDIA_STORAGE_CONF_API_POSTFIX: &str = "/describeMediaStorageConfiguration";
pub const AWS_CREATE_SIGNALING_CHANNEL_API_POSTFIX: &str = "/createSignalingChannel";
pub const AWS_GET_SIGNALING_CHANNEL_ENDPOINT_API_POSTFIX: &str = "/getSignalingChannelEndpoint";
pub const AWS_GET_ICE_CONFIG_API_POSTFIX: &str = "/v1/get-ice-server-config";
pub const AWS_JOIN_STORAGE_SESSION_API_POSTFIX: &str = "/joinStorageSession";
pub const AWS_DELETE_SIGNALING_CHANNEL_API_POSTFIX: &str = "/deleteSignalingChannel";

pub const AWS_SIGNALING_CHANNEL_ARN_PARAM_NAME: &str = "X-Amz-ChannelARN";
pub const AWS_SIGNALING_CLIENT_ID_PARAM_NAME: &str = "X-Amz-ClientId";

/// Room for `"WSS", "HTTPS", "WEBRTC"` plus the reserved slot
pub const PROTOCOLS_SCRATCH_LEN: usize = 25;

/// Caller-owned URL and body buffers plus the lengths last rendered into them
#[derive(Debug)]
pub struct SignalRequest<'b> {
    url: &'b mut [u8],
    url_len: usize,
    body: &'b mut [u8],
    body_len: usize,
}

impl<'b> SignalRequest<'b> {
    pub fn new(url: &'b mut [u8], body: &'b mut [u8]) -> Self {
        Self {
            url,
            url_len: 0,
            body,
            body_len: 0,
        }
    }

    pub fn url(&self) -> &str {
        std::str::from_utf8(&self.url[..self.url_len]).unwrap_or_default()
    }

    /// Rendered JSON body; empty for [`connect_wss_endpoint`]
    pub fn body(&self) -> &str {
        std::str::from_utf8(&self.body[..self.body_len]).unwrap_or_default()
    }

    pub fn url_len(&self) -> usize {
        self.url_len
    }

    pub fn body_len(&self) -> usize {
        self.body_len
    }

    fn render<U, B>(&mut self, url: U, body: B) -> Result<()>
    where
        U: FnOnce(&mut BoundedWriter<'_>) -> Result<()>,
        B: FnOnce(&mut BoundedWriter<'_>) -> Result<()>,
    {
        self.url_len = 0;
        self.body_len = 0;

        let mut w = BoundedWriter::with_terminator(&mut *self.url);
        url(&mut w)?;
        let url_len = w.finish();

        let mut w = BoundedWriter::with_terminator(&mut *self.body);
        body(&mut w)?;
        self.body_len = w.finish();
        self.url_len = url_len;
        Ok(())
    }
}

// ============================================================================
// INPUT RESOLUTION
// ============================================================================

fn resolve_channel_name<'a>(explicit: Option<&'a str>, ctx: &'a SignalContext) -> Result<&'a str> {
    let name = explicit
        .or(ctx.channel_name())
        .ok_or(SignalError::BadParam("channel_name"))?;
    check_channel_name(name)?;
    Ok(name)
}

fn resolve_channel_arn<'a>(explicit: Option<&'a str>, ctx: &'a SignalContext) -> Result<&'a str> {
    let arn = explicit
        .or(ctx.channel_arn())
        .ok_or(SignalError::BadParam("channel_arn"))?;
    if !is_valid_arn(arn) {
        return Err(SignalError::BadParam("channel_arn"));
    }
    Ok(arn)
}

fn resolve_client_id<'a>(explicit: Option<&'a str>, ctx: &'a SignalContext) -> Result<&'a str> {
    let client_id = explicit
        .or(ctx.client_id())
        .ok_or(SignalError::BadParam("client_id"))?;
    if client_id.is_empty() || client_id.len() > AWS_SIGNALING_CLIENT_ID_MAX_LENGTH {
        return Err(SignalError::BadParam("client_id"));
    }
    Ok(client_id)
}

fn check_role(role: Role) -> Result<()> {
    match role {
        Role::Unknown => Err(SignalError::BadParam("role")),
        _ => Ok(()),
    }
}

fn remember_arn(ctx: &mut SignalContext, explicit: Option<&str>) -> Result<()> {
    match explicit {
        Some(arn) => ctx.set_channel_arn(arn),
        None => Ok(()),
    }
}

fn remember_client_id(ctx: &mut SignalContext, explicit: Option<&str>) -> Result<()> {
    match explicit {
        Some(client_id) => ctx.set_client_id(client_id),
        None => Ok(()),
    }
}

fn control_plane_url<'w>(
    ctx: &'w SignalContext,
    postfix: &'static str,
) -> impl FnOnce(&mut BoundedWriter<'_>) -> Result<()> + 'w {
    move |w| {
        w.put_str(ctx.control_plane_url())?;
        w.put_str(postfix)?;
        Ok(())
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// `DescribeSignalingChannel`
///
/// Records the channel name in the context.
pub fn describe_channel(
    ctx: &mut SignalContext,
    req: &DescribeChannelRequest<'_>,
    out: &mut SignalRequest<'_>,
) -> Result<()> {
    let name = resolve_channel_name(req.channel_name, ctx)?;

    out.render(
        control_plane_url(ctx, AWS_DESCRIBE_SIGNALING_CHANNEL_API_POSTFIX),
        |w| {
            w.put_fmt(format_args!("{{\n\t\"ChannelName\": \"{}\"\n}}", name))?;
            Ok(())
        },
    )?;

    if let Some(name) = req.channel_name {
        ctx.set_channel_name(name)?;
    }
    debug!(api = "describeSignalingChannel", url_len = out.url_len, body_len = out.body_len, "built request");
    Ok(())
}

/// `DescribeMediaStorageConfiguration`
///
/// Records the channel ARN in the context.
pub fn describe_media_storage_config(
    ctx: &mut SignalContext,
    req: &DescribeMediaStorageConfigRequest<'_>,
    out: &mut SignalRequest<'_>,
) -> Result<()> {
    let arn = resolve_channel_arn(req.channel_arn, ctx)?;

    out.render(
        control_plane_url(ctx, AWS_DESCRIBE_MEDIA_STORAGE_CONF_API_POSTFIX),
        |w| {
            w.put_fmt(format_args!("{{\n\t\"ChannelARN\": \"{}\"\n}}", arn))?;
            Ok(())
        },
    )?;

    remember_arn(ctx, req.channel_arn)?;
    debug!(api = "describeMediaStorageConfiguration", url_len = out.url_len, body_len = out.body_len, "built request");
    Ok(())
}

/// `CreateSignalingChannel`
///
/// Only `SINGLE_MASTER` channels can be created. Records the channel name,
/// type and message TTL in the context.
pub fn create_channel(
    ctx: &mut SignalContext,
    req: &CreateChannelRequest<'_>,
    out: &mut SignalRequest<'_>,
) -> Result<()> {
    check_channel_name(req.channel_name)?;
    if req.channel_type != ChannelType::SingleMaster {
        return Err(SignalError::InvalidChannelType(req.channel_type.as_str().to_string()));
    }
    let ttl_range = AWS_MESSAGE_CHANNEL_TTL_SECONDS_MIN..=AWS_MESSAGE_CHANNEL_TTL_SECONDS_MAX;
    if !ttl_range.contains(&req.message_ttl_seconds) {
        return Err(SignalError::InvalidTtl(format!(
            "message ttl {} not in {:?}",
            req.message_ttl_seconds, ttl_range
        )));
    }
    if req.tags.iter().any(|tag| tag.name.is_empty()) {
        return Err(SignalError::BadParam("tags"));
    }

    out.render(
        control_plane_url(ctx, AWS_CREATE_SIGNALING_CHANNEL_API_POSTFIX),
        |w| {
            w.put_fmt(format_args!(
                "{{\n\t\"ChannelName\": \"{}\",\n\t\"ChannelType\": \"{}\",\n\t\"SingleMasterConfiguration\": {{\n\t\t\"MessageTtlSeconds\": {}\n\t}}",
                req.channel_name,
                req.channel_type.as_str(),
                req.message_ttl_seconds
            ))?;
            if !req.tags.is_empty() {
                w.put_str(",\n\t\"Tags\": [")?;
                for (i, tag) in req.tags.iter().enumerate() {
                    let sep = if i > 0 { "," } else { "" };
                    w.put_fmt(format_args!(
                        "{}\n\t\t{{\n\t\t\t\"Key\": \"{}\",\n\t\t\t\"Value\": \"{}\"\n\t\t}}",
                        sep, tag.name, tag.value
                    ))?;
                }
                w.put_str("\n\t]")?;
            }
            w.put_str("\n}")?;
            Ok(())
        },
    )?;

    ctx.set_channel_name(req.channel_name)?;
    ctx.set_channel_type(req.channel_type);
    ctx.set_message_ttl_seconds(req.message_ttl_seconds);
    debug!(api = "createSignalingChannel", tags = req.tags.len(), url_len = out.url_len, body_len = out.body_len, "built request");
    Ok(())
}

/// `GetSignalingChannelEndpoint`
///
/// Protocols are always listed in `WSS, HTTPS, WEBRTC` order regardless of
/// how the set was built. Records the channel ARN in the context.
pub fn get_channel_endpoint(
    ctx: &mut SignalContext,
    req: &GetChannelEndpointRequest<'_>,
    out: &mut SignalRequest<'_>,
) -> Result<()> {
    let arn = resolve_channel_arn(req.channel_arn, ctx)?;
    check_role(req.role)?;
    if req.protocols.is_empty() {
        return Err(SignalError::BadParam("protocols"));
    }

    let mut scratch = [0u8; PROTOCOLS_SCRATCH_LEN];
    let mut protocols = BoundedWriter::with_terminator(&mut scratch);
    let mut first = true;
    for (flag, name) in EndpointProtocols::ORDERED {
        if req.protocols.contains(flag) {
            let sep = if first { "" } else { ", " };
            protocols.put_fmt(format_args!("{}\"{}\"", sep, name))?;
            first = false;
        }
    }
    let protocols = protocols.as_str();

    out.render(
        control_plane_url(ctx, AWS_GET_SIGNALING_CHANNEL_ENDPOINT_API_POSTFIX),
        |w| {
            w.put_fmt(format_args!(
                "{{\n\t\"ChannelARN\": \"{}\",\n\t\"SingleMasterChannelEndpointConfiguration\": {{\n\t\t\"Protocols\": [{}],\n\t\t\"Role\": \"{}\"\n\t}}\n}}",
                arn,
                protocols,
                req.role.as_str()
            ))?;
            Ok(())
        },
    )?;

    remember_arn(ctx, req.channel_arn)?;
    debug!(api = "getSignalingChannelEndpoint", protocols = req.protocols.bits(), url_len = out.url_len, body_len = out.body_len, "built request");
    Ok(())
}

/// `GetIceServerConfig`, sent to the channel's HTTPS endpoint
///
/// Records the endpoint, channel ARN and client id in the context.
pub fn get_ice_server_config(
    ctx: &mut SignalContext,
    req: &GetIceServerConfigRequest<'_>,
    out: &mut SignalRequest<'_>,
) -> Result<()> {
    let endpoint = req
        .endpoint_https
        .or(ctx.channel_endpoint_https())
        .ok_or(SignalError::BadParam("endpoint_https"))?;
    check_endpoint(endpoint)?;
    let arn = resolve_channel_arn(req.channel_arn, ctx)?;
    let client_id = resolve_client_id(req.client_id, ctx)?;

    out.render(
        |w| {
            w.put_str(endpoint)?;
            w.put_str(AWS_GET_ICE_CONFIG_API_POSTFIX)?;
            Ok(())
        },
        |w| {
            w.put_fmt(format_args!(
                "{{\n\t\"ChannelARN\": \"{}\",\n\t\"ClientId\": \"{}\",\n\t\"Service\": \"TURN\"\n}}",
                arn, client_id
            ))?;
            Ok(())
        },
    )?;

    if let Some(endpoint) = req.endpoint_https {
        ctx.set_channel_endpoint_https(endpoint)?;
    }
    remember_arn(ctx, req.channel_arn)?;
    remember_client_id(ctx, req.client_id)?;
    debug!(api = "getIceServerConfig", url_len = out.url_len, body_len = out.body_len, "built request");
    Ok(())
}

/// `JoinStorageSession`, sent to the channel's WEBRTC endpoint
///
/// Viewers identify themselves with a client id; masters do not. Records
/// the channel ARN, and the client id for viewers, in the context.
pub fn join_storage_session(
    ctx: &mut SignalContext,
    req: &JoinStorageSessionRequest<'_>,
    out: &mut SignalRequest<'_>,
) -> Result<()> {
    check_endpoint(req.endpoint_webrtc)?;
    check_role(req.role)?;
    let arn = resolve_channel_arn(req.channel_arn, ctx)?;
    let client_id = match req.role {
        Role::Viewer => Some(resolve_client_id(req.client_id, ctx)?),
        _ => None,
    };

    out.render(
        |w| {
            w.put_str(req.endpoint_webrtc)?;
            w.put_str(AWS_JOIN_STORAGE_SESSION_API_POSTFIX)?;
            Ok(())
        },
        |w| {
            match client_id {
                Some(client_id) => w.put_fmt(format_args!(
                    "{{\n\t\"channelArn\": \"{}\",\n\t\"clientId\": \"{}\"\n}}",
                    arn, client_id
                ))?,
                None => w.put_fmt(format_args!("{{\n\t\"channelArn\": \"{}\"\n}}", arn))?,
            }
            Ok(())
        },
    )?;

    remember_arn(ctx, req.channel_arn)?;
    if req.role == Role::Viewer {
        remember_client_id(ctx, req.client_id)?;
    }
    debug!(api = "joinStorageSession", role = req.role.as_str(), url_len = out.url_len, body_len = out.body_len, "built request");
    Ok(())
}

/// `DeleteSignalingChannel`
///
/// `version` must be the channel's current `Version` as returned by
/// `DescribeSignalingChannel`.
pub fn delete_channel(
    ctx: &mut SignalContext,
    req: &DeleteChannelRequest<'_>,
    out: &mut SignalRequest<'_>,
) -> Result<()> {
    let arn = resolve_channel_arn(req.channel_arn, ctx)?;
    if req.version.is_empty() {
        return Err(SignalError::BadParam("version"));
    }

    out.render(
        control_plane_url(ctx, AWS_DELETE_SIGNALING_CHANNEL_API_POSTFIX),
        |w| {
            w.put_fmt(format_args!(
                "{{\n\t\"ChannelARN\": \"{}\",\n\t\"CurrentVersion\": \"{}\"\n}}",
                arn, req.version
            ))?;
            Ok(())
        },
    )?;

    remember_arn(ctx, req.channel_arn)?;
    debug!(api = "deleteSignalingChannel", url_len = out.url_len, body_len = out.body_len, "built request");
    Ok(())
}

/// Secure WebSocket connect URL; the body is left empty
///
/// ```text
/// master: {endpoint}?X-Amz-ChannelARN={arn}
/// viewer: {endpoint}?X-Amz-ChannelARN={arn}&X-Amz-ClientId={client id}
/// ```
pub fn connect_wss_endpoint(
    ctx: &mut SignalContext,
    req: &ConnectWssEndpointRequest<'_>,
    out: &mut SignalRequest<'_>,
) -> Result<()> {
    check_endpoint(req.endpoint_wss)?;
    check_role(req.role)?;
    let arn = resolve_channel_arn(req.channel_arn, ctx)?;
    let client_id = match req.role {
        Role::Viewer => Some(resolve_client_id(req.client_id, ctx)?),
        _ => None,
    };

    out.render(
        |w| {
            w.put_fmt(format_args!(
                "{}?{}={}",
                req.endpoint_wss, AWS_SIGNALING_CHANNEL_ARN_PARAM_NAME, arn
            ))?;
            if let Some(client_id) = client_id {
                w.put_fmt(format_args!("&{}={}", AWS_SIGNALING_CLIENT_ID_PARAM_NAME, client_id))?;
            }
            Ok(())
        },
        |_| Ok(()),
    )?;

    remember_arn(ctx, req.channel_arn)?;
    if req.role == Role::Viewer {
        remember_client_id(ctx, req.client_id)?;
    }
    debug!(api = "connectWssEndpoint", role = req.role.as_str(), url_len = out.url_len, "built request");
    Ok(())
}
