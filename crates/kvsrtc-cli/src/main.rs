//! kvsrtc CLI - offline inspection of SDP and Kinesis Video signaling payloads
//!
//! Parse and re-render SDP, render signaling API requests, decode API
//! responses and WebSocket messages. Nothing is sent over the network.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kvsrtc_signal::request::{self, SignalRequest};
use kvsrtc_signal::{response, wss};
use kvsrtc_signal::{
    ChannelType, ConnectWssEndpointRequest, CreateChannelRequest, DeleteChannelRequest,
    DescribeChannelRequest, DescribeMediaStorageConfigRequest, EndpointProtocols,
    GetChannelEndpointRequest, GetIceServerConfigRequest, JoinStorageSessionRequest,
    MessageType, Role, SignalConfig, SignalContext, Tag, WssSendMessage,
};

/// kvsrtc - SDP and Kinesis Video signaling codec tool
#[derive(Parser)]
#[command(name = "kvsrtc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML with a [signal] table)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// AWS region, overrides the config file
    #[arg(long, global = true, env = "AWS_DEFAULT_REGION")]
    region: Option<String>,

    /// Control plane URL, overrides the config file
    #[arg(long, global = true)]
    control_plane_url: Option<String>,

    /// Size of each output buffer in bytes
    #[arg(long, global = true, default_value = "8192")]
    buffer_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse or re-render SDP
    Sdp {
        #[command(subcommand)]
        action: SdpAction,
    },

    /// Render a signaling API request (URL and JSON body)
    Request {
        #[command(subcommand)]
        api: RequestApi,
    },

    /// Parse a signaling API response body
    Response {
        /// Which API produced the body
        #[arg(value_enum)]
        api: ResponseApi,

        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },

    /// Encode or decode WebSocket signaling messages
    Message {
        #[command(subcommand)]
        action: MessageAction,
    },

    /// Show version and supported APIs
    Info,
}

#[derive(Subcommand)]
enum SdpAction {
    /// Parse SDP and print the session as JSON
    Parse {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },

    /// Parse SDP and render it back in canonical line order
    Format {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum RequestApi {
    /// DescribeSignalingChannel
    DescribeChannel {
        #[arg(long)]
        channel_name: Option<String>,
    },

    /// DescribeMediaStorageConfiguration
    DescribeMediaStorageConfig {
        #[arg(long)]
        channel_arn: Option<String>,
    },

    /// CreateSignalingChannel
    CreateChannel {
        #[arg(long)]
        channel_name: String,

        /// Message TTL in seconds (5-120)
        #[arg(long, default_value = "60")]
        ttl: u32,

        /// Tags as key=value, repeatable
        #[arg(long)]
        tag: Vec<String>,
    },

    /// GetSignalingChannelEndpoint
    GetChannelEndpoint {
        #[arg(long)]
        channel_arn: Option<String>,

        /// Protocols to request
        #[arg(long, value_enum, value_delimiter = ',', default_values_t = [ProtocolArg::Wss, ProtocolArg::Https])]
        protocols: Vec<ProtocolArg>,

        #[arg(long, value_enum, default_value = "master")]
        role: RoleArg,
    },

    /// GetIceServerConfig
    GetIceServerConfig {
        #[arg(long)]
        channel_arn: Option<String>,

        /// HTTPS channel endpoint
        #[arg(long)]
        endpoint: Option<String>,

        #[arg(long)]
        client_id: Option<String>,
    },

    /// JoinStorageSession
    JoinStorageSession {
        /// WEBRTC channel endpoint
        #[arg(long)]
        endpoint: String,

        #[arg(long)]
        channel_arn: Option<String>,

        #[arg(long, value_enum, default_value = "master")]
        role: RoleArg,

        #[arg(long)]
        client_id: Option<String>,
    },

    /// DeleteSignalingChannel
    DeleteChannel {
        #[arg(long)]
        channel_arn: Option<String>,

        /// Current channel version
        #[arg(long)]
        version: String,
    },

    /// Secure WebSocket connect URL
    ConnectWss {
        /// WSS channel endpoint
        #[arg(long)]
        endpoint: String,

        #[arg(long)]
        channel_arn: Option<String>,

        #[arg(long, value_enum, default_value = "master")]
        role: RoleArg,

        #[arg(long)]
        client_id: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResponseApi {
    DescribeChannel,
    CreateChannel,
    DescribeMediaStorageConfig,
    GetChannelEndpoint,
    GetIceServerConfig,
}

#[derive(Subcommand)]
enum MessageAction {
    /// Render an outbound message
    Encode {
        #[arg(long = "type", value_enum)]
        message_type: MessageTypeArg,

        #[arg(long, default_value = "")]
        recipient: String,

        /// Base64 payload
        #[arg(long)]
        payload: String,

        #[arg(long)]
        correlation_id: Option<String>,
    },

    /// Parse an inbound message and print it as JSON
    Decode {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProtocolArg {
    Wss,
    Https,
    Webrtc,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Master,
    Viewer,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MessageTypeArg {
    SdpOffer,
    SdpAnswer,
    IceCandidate,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Master => Role::Master,
            RoleArg::Viewer => Role::Viewer,
        }
    }
}

impl From<MessageTypeArg> for MessageType {
    fn from(message_type: MessageTypeArg) -> Self {
        match message_type {
            MessageTypeArg::SdpOffer => MessageType::SdpOffer,
            MessageTypeArg::SdpAnswer => MessageType::SdpAnswer,
            MessageTypeArg::IceCandidate => MessageType::IceCandidate,
        }
    }
}

/// Configuration file layout
#[derive(Debug, Default, Deserialize)]
struct CliConfig {
    #[serde(default)]
    signal: SignalConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli.log_level, cli.json_logs)?;

    match cli.command {
        Commands::Sdp { ref action } => run_sdp(action, cli.buffer_size)?,
        Commands::Request { ref api } => {
            let mut ctx = load_context(&cli)?;
            run_request(&mut ctx, api, cli.buffer_size)?;
        }
        Commands::Response { api, ref input } => {
            let mut ctx = load_context(&cli)?;
            let body = read_input(input.as_deref())?;
            run_response(&mut ctx, api, &body)?;
        }
        Commands::Message { ref action } => run_message(action, cli.buffer_size)?,
        Commands::Info => print_info(),
    }

    Ok(())
}

fn setup_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Failed to parse log level")?;

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_context(cli: &Cli) -> Result<SignalContext> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let file: CliConfig = toml::from_str(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?;
            info!(path = %path.display(), "loaded config");
            file.signal
        }
        None => SignalConfig::default(),
    };

    if let Some(region) = &cli.region {
        config.region = Some(region.clone());
    }
    if let Some(url) = &cli.control_plane_url {
        config.control_plane_url = Some(url.clone());
    }

    SignalContext::from_config(&config).context("Invalid signaling configuration")
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_sdp(action: &SdpAction, buffer_size: usize) -> Result<()> {
    let (input, format) = match action {
        SdpAction::Parse { input } => (input, false),
        SdpAction::Format { input } => (input, true),
    };

    let bytes = read_input(input.as_deref())?;
    let text = std::str::from_utf8(&bytes).context("SDP is not UTF-8")?;
    let session = kvsrtc_sdp::deserialize(text).context("Failed to parse SDP")?;
    debug!(media = session.media_descriptions.len(), "parsed sdp");

    if !format {
        return print_json(&session);
    }

    let mut buf = vec![0u8; buffer_size];
    let len = kvsrtc_sdp::serialize(&session, &mut buf).context("Failed to render SDP")?;
    print!("{}", String::from_utf8_lossy(&buf[..len]));
    Ok(())
}

fn parse_tags(tags: &[String]) -> Result<Vec<(&str, &str)>> {
    tags.iter()
        .map(|tag| match tag.split_once('=') {
            Some((name, value)) => Ok((name, value)),
            None => bail!("Tag must be key=value, got {:?}", tag),
        })
        .collect()
}

fn run_request(ctx: &mut SignalContext, api: &RequestApi, buffer_size: usize) -> Result<()> {
    let mut url = vec![0u8; buffer_size];
    let mut body = vec![0u8; buffer_size];
    let mut out = SignalRequest::new(&mut url, &mut body);

    let name = match api {
        RequestApi::DescribeChannel { channel_name } => {
            let req = DescribeChannelRequest {
                channel_name: channel_name.as_deref(),
            };
            request::describe_channel(ctx, &req, &mut out)?;
            "DescribeSignalingChannel"
        }
        RequestApi::DescribeMediaStorageConfig { channel_arn } => {
            let req = DescribeMediaStorageConfigRequest {
                channel_arn: channel_arn.as_deref(),
            };
            request::describe_media_storage_config(ctx, &req, &mut out)?;
            "DescribeMediaStorageConfiguration"
        }
        RequestApi::CreateChannel {
            channel_name,
            ttl,
            tag,
        } => {
            let tags: Vec<Tag<'_>> = parse_tags(tag)?
                .into_iter()
                .map(|(name, value)| Tag { name, value })
                .collect();
            let req = CreateChannelRequest {
                channel_name,
                channel_type: ChannelType::SingleMaster,
                message_ttl_seconds: *ttl,
                tags: &tags,
            };
            request::create_channel(ctx, &req, &mut out)?;
            "CreateSignalingChannel"
        }
        RequestApi::GetChannelEndpoint {
            channel_arn,
            protocols,
            role,
        } => {
            let protocols = protocols
                .iter()
                .fold(EndpointProtocols::NONE, |set, protocol| {
                    set | match protocol {
                        ProtocolArg::Wss => EndpointProtocols::WSS,
                        ProtocolArg::Https => EndpointProtocols::HTTPS,
                        ProtocolArg::Webrtc => EndpointProtocols::WEBRTC,
                    }
                });
            let req = GetChannelEndpointRequest {
                channel_arn: channel_arn.as_deref(),
                protocols,
                role: (*role).into(),
            };
            request::get_channel_endpoint(ctx, &req, &mut out)?;
            "GetSignalingChannelEndpoint"
        }
        RequestApi::GetIceServerConfig {
            channel_arn,
            endpoint,
            client_id,
        } => {
            let req = GetIceServerConfigRequest {
                channel_arn: channel_arn.as_deref(),
                endpoint_https: endpoint.as_deref(),
                client_id: client_id.as_deref(),
            };
            request::get_ice_server_config(ctx, &req, &mut out)?;
            "GetIceServerConfig"
        }
        RequestApi::JoinStorageSession {
            endpoint,
            channel_arn,
            role,
            client_id,
        } => {
            let req = JoinStorageSessionRequest {
                endpoint_webrtc: endpoint,
                channel_arn: channel_arn.as_deref(),
                role: (*role).into(),
                client_id: client_id.as_deref(),
            };
            request::join_storage_session(ctx, &req, &mut out)?;
            "JoinStorageSession"
        }
        RequestApi::DeleteChannel {
            channel_arn,
            version,
        } => {
            let req = DeleteChannelRequest {
                channel_arn: channel_arn.as_deref(),
                version,
            };
            request::delete_channel(ctx, &req, &mut out)?;
            "DeleteSignalingChannel"
        }
        RequestApi::ConnectWss {
            endpoint,
            channel_arn,
            role,
            client_id,
        } => {
            let req = ConnectWssEndpointRequest {
                endpoint_wss: endpoint,
                channel_arn: channel_arn.as_deref(),
                role: (*role).into(),
                client_id: client_id.as_deref(),
            };
            request::connect_wss_endpoint(ctx, &req, &mut out)?;
            "ConnectWssEndpoint"
        }
    };

    println!("{} {}", "API".cyan().bold(), name);
    println!("{} {}", "URL".cyan().bold(), out.url());
    if out.body_len() > 0 {
        println!("{}", "BODY".cyan().bold());
        println!("{}", out.body());
    }
    Ok(())
}

fn run_response(ctx: &mut SignalContext, api: ResponseApi, body: &[u8]) -> Result<()> {
    match api {
        ResponseApi::DescribeChannel => print_json(&response::parse_describe_channel(ctx, body)?)?,
        ResponseApi::CreateChannel => print_json(&response::parse_create_channel(ctx, body)?)?,
        ResponseApi::DescribeMediaStorageConfig => {
            print_json(&response::parse_describe_media_storage_config(body)?)?
        }
        ResponseApi::GetChannelEndpoint => {
            print_json(&response::parse_get_channel_endpoint(ctx, body)?)?
        }
        ResponseApi::GetIceServerConfig => {
            print_json(&response::parse_get_ice_server_config(body)?)?
        }
    }

    debug!(context = ?ctx, "signal context after parse");
    Ok(())
}

fn run_message(action: &MessageAction, buffer_size: usize) -> Result<()> {
    match action {
        MessageAction::Encode {
            message_type,
            recipient,
            payload,
            correlation_id,
        } => {
            let message = WssSendMessage {
                message_type: (*message_type).into(),
                recipient_client_id: recipient,
                base64_payload: payload,
                correlation_id: correlation_id.as_deref(),
                ..Default::default()
            };
            let mut buf = vec![0u8; buffer_size];
            let len = wss::build_send_message(&message, &mut buf)?;
            println!("{}", String::from_utf8_lossy(&buf[..len]));
        }
        MessageAction::Decode { input } => {
            let bytes = read_input(input.as_deref())?;
            let message = wss::parse_recv_message(&bytes)?;
            print_json(&message)?;
        }
    }
    Ok(())
}

fn print_info() {
    println!(
        "{}",
        "kvsrtc - SDP and Kinesis Video signaling codecs".cyan().bold()
    );
    println!();
    println!("Version:    {}", env!("CARGO_PKG_VERSION"));
    println!("Platform:   {}", std::env::consts::OS);
    println!("Arch:       {}", std::env::consts::ARCH);
    println!();
    println!("{}", "Signaling APIs:".green());
    println!("  - DescribeSignalingChannel");
    println!("  - DescribeMediaStorageConfiguration");
    println!("  - CreateSignalingChannel");
    println!("  - GetSignalingChannelEndpoint");
    println!("  - GetIceServerConfig");
    println!("  - JoinStorageSession");
    println!("  - DeleteSignalingChannel");
    println!("  - ConnectWssEndpoint (URL only)");
    println!();
    println!("{}", "Examples:".green());
    println!("  kvsrtc sdp parse offer.sdp                                # SDP as JSON");
    println!("  kvsrtc request describe-channel --channel-name door      # Render request");
    println!("  kvsrtc response get-ice-server-config ice.json            # Decode response");
    println!("  kvsrtc message decode < frame.json                        # Decode WSS message");
}
