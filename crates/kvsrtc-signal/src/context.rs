//! Per-session signaling state
//!
//! A [`SignalContext`] remembers what earlier calls learned so later calls
//! can omit it: `describe_channel` records the channel name, its response
//! records the ARN, `get_channel_endpoint`'s response records the HTTPS
//! endpoint that `get_ice_server_config` then targets, and so on. Each
//! builder and parser documents which fields it writes.

use kvsrtc_core::BoundedWriter;
use serde::Serialize;
use tracing::debug;

use crate::types::ChannelType;
use crate::{
    Result, SignalConfig, SignalError, AWS_CONTROL_PLANE_URI_POSTFIX,
    AWS_CONTROL_PLANE_URI_PREFIX, AWS_CONTROL_PLANE_URL_MAX_LENGTH, AWS_DEFAULT_REGION,
    AWS_KINESIS_VIDEO_SERVICE_NAME, AWS_MAX_ARN_LEN, AWS_MAX_CHANNEL_NAME_LEN,
    AWS_REGION_MAX_LENGTH, AWS_SIGNALING_CLIENT_ID_MAX_LENGTH,
};

/// Signaling session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalContext {
    region: String,
    control_plane_url: String,
    channel_name: String,
    channel_arn: String,
    client_id: String,
    channel_endpoint_https: String,
    channel_type: ChannelType,
    message_ttl_seconds: Option<u32>,
}

impl SignalContext {
    /// Create a context for `region` (default `us-west-2`)
    ///
    /// Without an explicit control plane URL one is derived as
    /// `https://kinesisvideo.{region}.amazonaws.com`.
    pub fn new(region: Option<&str>, control_plane_url: Option<&str>) -> Result<Self> {
        let region = region.unwrap_or(AWS_DEFAULT_REGION);
        if region.is_empty() || region.len() > AWS_REGION_MAX_LENGTH {
            return Err(SignalError::BadParam("region"));
        }

        let control_plane_url = match control_plane_url {
            Some(url) => {
                check_endpoint(url)?;
                url.to_string()
            }
            None => derive_control_plane_url(region)?,
        };

        debug!(%region, %control_plane_url, "created signal context");

        Ok(Self {
            region: region.to_string(),
            control_plane_url,
            channel_name: String::new(),
            channel_arn: String::new(),
            client_id: String::new(),
            channel_endpoint_https: String::new(),
            channel_type: ChannelType::Unknown,
            message_ttl_seconds: None,
        })
    }

    /// Create a context from configuration, seeding the optional fields
    pub fn from_config(config: &SignalConfig) -> Result<Self> {
        let mut ctx = Self::new(config.region.as_deref(), config.control_plane_url.as_deref())?;
        if let Some(name) = &config.channel_name {
            ctx.set_channel_name(name)?;
        }
        if let Some(arn) = &config.channel_arn {
            ctx.set_channel_arn(arn)?;
        }
        if let Some(client_id) = &config.client_id {
            ctx.set_client_id(client_id)?;
        }
        Ok(ctx)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn control_plane_url(&self) -> &str {
        &self.control_plane_url
    }

    pub fn channel_name(&self) -> Option<&str> {
        non_empty(&self.channel_name)
    }

    pub fn channel_arn(&self) -> Option<&str> {
        non_empty(&self.channel_arn)
    }

    pub fn client_id(&self) -> Option<&str> {
        non_empty(&self.client_id)
    }

    pub fn channel_endpoint_https(&self) -> Option<&str> {
        non_empty(&self.channel_endpoint_https)
    }

    pub fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    pub fn message_ttl_seconds(&self) -> Option<u32> {
        self.message_ttl_seconds
    }

    pub fn set_channel_name(&mut self, name: &str) -> Result<()> {
        check_channel_name(name)?;
        replace(&mut self.channel_name, name, "channel_name");
        Ok(())
    }

    pub fn set_channel_arn(&mut self, arn: &str) -> Result<()> {
        if !is_valid_arn(arn) {
            return Err(SignalError::BadParam("channel_arn"));
        }
        replace(&mut self.channel_arn, arn, "channel_arn");
        Ok(())
    }

    pub fn set_client_id(&mut self, client_id: &str) -> Result<()> {
        if client_id.is_empty() || client_id.len() > AWS_SIGNALING_CLIENT_ID_MAX_LENGTH {
            return Err(SignalError::BadParam("client_id"));
        }
        replace(&mut self.client_id, client_id, "client_id");
        Ok(())
    }

    pub fn set_channel_endpoint_https(&mut self, endpoint: &str) -> Result<()> {
        check_endpoint(endpoint)?;
        replace(&mut self.channel_endpoint_https, endpoint, "channel_endpoint_https");
        Ok(())
    }

    pub(crate) fn set_channel_type(&mut self, channel_type: ChannelType) {
        self.channel_type = channel_type;
    }

    pub(crate) fn set_message_ttl_seconds(&mut self, ttl: u32) {
        self.message_ttl_seconds = Some(ttl);
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn replace(field: &mut String, value: &str, name: &'static str) {
    if field != value {
        debug!(field = name, %value, "signal context updated");
        field.clear();
        field.push_str(value);
    }
}

pub(crate) fn check_channel_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > AWS_MAX_CHANNEL_NAME_LEN {
        return Err(SignalError::InvalidChannelName(name.len()));
    }
    Ok(())
}

pub(crate) fn is_valid_arn(arn: &str) -> bool {
    !arn.is_empty() && arn.len() <= AWS_MAX_ARN_LEN
}

pub(crate) fn check_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.is_empty() || endpoint.len() >= AWS_CONTROL_PLANE_URL_MAX_LENGTH {
        return Err(SignalError::InvalidEndpoint(format!(
            "length {} not in 1..{}",
            endpoint.len(),
            AWS_CONTROL_PLANE_URL_MAX_LENGTH
        )));
    }
    Ok(())
}

fn derive_control_plane_url(region: &str) -> Result<String> {
    let mut buf = [0u8; AWS_CONTROL_PLANE_URL_MAX_LENGTH];
    let mut w = BoundedWriter::with_terminator(&mut buf);
    w.put_fmt(format_args!(
        "{}{}.{}{}",
        AWS_CONTROL_PLANE_URI_PREFIX, AWS_KINESIS_VIDEO_SERVICE_NAME, region, AWS_CONTROL_PLANE_URI_POSTFIX
    ))?;
    Ok(w.as_str().to_string())
}
