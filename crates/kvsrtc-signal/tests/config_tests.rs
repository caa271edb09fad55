//! Configuration loading tests

use kvsrtc_signal::{SignalConfig, SignalContext, SignalError};
use serde::Deserialize;

#[derive(Deserialize)]
struct File {
    #[serde(default)]
    signal: SignalConfig,
}

#[test]
fn test_signal_table() {
    let file: File = toml::from_str(
        r#"
        [signal]
        region = "eu-central-1"
        channel_name = "front-door"
        client_id = "viewer-7"
        "#,
    )
    .expect("parse failed");

    let ctx = SignalContext::from_config(&file.signal).unwrap();
    assert_eq!(ctx.region(), "eu-central-1");
    assert_eq!(ctx.control_plane_url(), "https://kinesisvideo.eu-central-1.amazonaws.com");
    assert_eq!(ctx.channel_name(), Some("front-door"));
    assert_eq!(ctx.client_id(), Some("viewer-7"));
    assert_eq!(ctx.channel_arn(), None);
}

#[test]
fn test_missing_table_uses_defaults() {
    let file: File = toml::from_str("").unwrap();
    assert_eq!(file.signal, SignalConfig::default());

    let ctx = SignalContext::from_config(&file.signal).unwrap();
    assert_eq!(ctx.region(), "us-west-2");
}

#[test]
fn test_invalid_values_rejected() {
    let config = SignalConfig {
        channel_name: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(
        SignalContext::from_config(&config),
        Err(SignalError::InvalidChannelName(0))
    );
}
