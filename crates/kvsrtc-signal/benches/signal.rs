//! Signaling benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kvsrtc_signal::request::{self, SignalRequest};
use kvsrtc_signal::response::parse_get_ice_server_config;
use kvsrtc_signal::wss::{build_send_message, parse_recv_message};
use kvsrtc_signal::{
    EndpointProtocols, GetChannelEndpointRequest, MessageType, Role, SignalContext,
    WssSendMessage,
};

const ICE_CONFIG: &[u8] = br#"{"IceServerList": [
    {"Password": "p1", "Ttl": 300, "Uris": ["turn:1.2.3.4:443?transport=udp", "turns:1.2.3.4:443?transport=tcp"], "Username": "u1"},
    {"Password": "p2", "Ttl": 300, "Uris": ["turn:5.6.7.8:443?transport=udp", "turns:5.6.7.8:443?transport=tcp"], "Username": "u2"}
]}"#;

const OFFER: &[u8] = br#"{"senderClientId": "viewer-1", "messageType": "SDP_OFFER", "messagePayload": "eyJ0eXBlIjoib2ZmZXIiLCJzZHAiOiJ2PTBcclxuIn0="}"#;

fn request_benchmark(c: &mut Criterion) {
    let mut ctx = SignalContext::new(None, None).unwrap();
    let req = GetChannelEndpointRequest {
        channel_arn: Some("arn:aws:kinesisvideo:us-west-2:123456789012:channel/front-door/1"),
        protocols: EndpointProtocols::WSS | EndpointProtocols::HTTPS,
        role: Role::Master,
    };

    c.bench_function("build_get_channel_endpoint", |b| {
        let (mut url, mut body) = ([0u8; 256], [0u8; 512]);
        b.iter(|| {
            let mut out = SignalRequest::new(&mut url, &mut body);
            request::get_channel_endpoint(&mut ctx, black_box(&req), &mut out).unwrap();
            black_box(out.body_len())
        })
    });
}

fn response_benchmark(c: &mut Criterion) {
    c.bench_function("parse_ice_server_config", |b| {
        b.iter(|| black_box(parse_get_ice_server_config(black_box(ICE_CONFIG)).unwrap()))
    });
}

fn wss_benchmark(c: &mut Criterion) {
    let message = WssSendMessage {
        message_type: MessageType::SdpAnswer,
        recipient_client_id: "viewer-1",
        base64_payload: "eyJ0eXBlIjoiYW5zd2VyIn0=",
        ..Default::default()
    };

    c.bench_function("build_send_message", |b| {
        let mut buf = [0u8; 1024];
        b.iter(|| black_box(build_send_message(black_box(&message), &mut buf).unwrap()))
    });

    c.bench_function("parse_recv_message", |b| {
        b.iter(|| black_box(parse_recv_message(black_box(OFFER)).unwrap()))
    });
}

criterion_group!(benches, request_benchmark, response_benchmark, wss_benchmark);
criterion_main!(benches);
