//! Signaling session configuration
//!
//! Loaded from the `[signal]` table of a TOML file by the CLI, or built in
//! code. Every field is optional; see [`SignalContext::from_config`].
//!
//! ```toml
//! [signal]
//! region = "eu-central-1"
//! channel_name = "front-door"
//! client_id = "viewer-7"
//! ```
//!
//! [`SignalContext::from_config`]: crate::SignalContext::from_config

use serde::{Deserialize, Serialize};

/// Signaling session configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// AWS region, defaults to [`AWS_DEFAULT_REGION`](crate::AWS_DEFAULT_REGION)
    pub region: Option<String>,
    /// Control plane URL, derived from the region when unset
    pub control_plane_url: Option<String>,
    /// Channel name to seed the context with
    pub channel_name: Option<String>,
    /// Channel ARN to seed the context with
    pub channel_arn: Option<String>,
    /// Client id used by viewer-side requests
    pub client_id: Option<String>,
}
