//! WebSocket message codec tests

use kvsrtc_signal::wss::{build_send_message, parse_recv_message};
use kvsrtc_signal::{IceServer, IceServerList, MessageType, SignalError, WssSendMessage};

fn turn_servers(count: usize) -> IceServerList<'static> {
    IceServerList {
        servers: (0..count)
            .map(|_| IceServer {
                password: Some("secret"),
                ttl_seconds: 300,
                uris: vec!["turn:1.2.3.4:443?transport=udp", "turns:1.2.3.4:443?transport=tcp"],
                username: Some("1700000000:channel"),
            })
            .collect(),
    }
}

fn render(message: &WssSendMessage<'_>) -> String {
    let mut buf = vec![0u8; 4096];
    let len = build_send_message(message, &mut buf).expect("build failed");
    String::from_utf8(buf[..len].to_vec()).unwrap()
}

#[test]
fn test_offer_with_correlation_id_and_ice_servers() {
    let message = WssSendMessage {
        message_type: MessageType::SdpOffer,
        recipient_client_id: "viewer-1",
        base64_payload: "eyJ0eXBlIjoib2ZmZXIifQ==",
        correlation_id: Some("c-42"),
        ice_server_list: turn_servers(1),
    };

    assert_eq!(
        render(&message),
        "{\n\t\"action\": \"SDP_OFFER\",\
         \n\t\"RecipientClientId\": \"viewer-1\",\
         \n\t\"MessagePayload\": \"eyJ0eXBlIjoib2ZmZXIifQ==\",\
         \n\t\"CorrelationId\": \"c-42\",\
         \n\t\"IceServerList\": [\
         \n\t\t{\
         \n\t\t\t\"Password\": \"secret\",\
         \n\t\t\t\"Ttl\": 300,\
         \n\t\t\t\"Uris\": [\
         \n\t\t\t\t\"turn:1.2.3.4:443?transport=udp\",\
         \n\t\t\t\t\"turns:1.2.3.4:443?transport=tcp\"\
         \n\t\t\t],\
         \n\t\t\t\"Username\": \"1700000000:channel\"\
         \n\t\t}\
         \n\t]\
         \n}"
    );
}

#[test]
fn test_sent_message_is_valid_json() {
    let message = WssSendMessage {
        message_type: MessageType::SdpOffer,
        recipient_client_id: "",
        base64_payload: "cGF5bG9hZA==",
        correlation_id: None,
        ice_server_list: turn_servers(3),
    };
    let text = render(&message);
    let value: serde_json::Value = serde_json::from_str(&text).expect("not json");
    assert_eq!(value["IceServerList"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["IceServerList"][2]["Ttl"], 300);
}

#[test]
fn test_ice_servers_only_on_offer() {
    let message = WssSendMessage {
        message_type: MessageType::IceCandidate,
        recipient_client_id: "viewer-1",
        base64_payload: "Y2FuZGlkYXRl",
        correlation_id: None,
        ice_server_list: turn_servers(2),
    };
    let text = render(&message);
    assert!(text.contains("\"action\": \"ICE_CANDIDATE\""));
    assert!(!text.contains("IceServerList"));
}

#[test]
fn test_unsendable_type_uses_unknown_action() {
    let message = WssSendMessage {
        message_type: MessageType::StatusResponse,
        recipient_client_id: "viewer-1",
        base64_payload: "eA==",
        ..Default::default()
    };
    assert!(render(&message).contains("\"action\": \"UNKOWN\""));
}

#[test]
fn test_too_many_ice_servers() {
    let message = WssSendMessage {
        message_type: MessageType::SdpOffer,
        recipient_client_id: "viewer-1",
        base64_payload: "eA==",
        correlation_id: None,
        ice_server_list: turn_servers(6),
    };
    let mut buf = vec![0u8; 8192];
    assert_eq!(
        build_send_message(&message, &mut buf),
        Err(SignalError::InvalidIceServerCount(6))
    );
}

#[test]
fn test_send_boundary() {
    let message = WssSendMessage {
        message_type: MessageType::SdpAnswer,
        recipient_client_id: "viewer-1",
        base64_payload: "eA==",
        ..Default::default()
    };
    let len = render(&message).len();

    let mut exact = vec![0u8; len];
    assert!(matches!(
        build_send_message(&message, &mut exact),
        Err(SignalError::OutOfMemory { .. })
    ));

    let mut roomy = vec![0u8; len + 1];
    assert_eq!(build_send_message(&message, &mut roomy), Ok(len));
}

#[test]
fn test_parse_offer() {
    let raw = br#"{"senderClientId": "viewer-1", "messageType": "SDP_OFFER", "messagePayload": "eyJzZHAiOiJ2PTAifQ=="}"#;
    let message = parse_recv_message(raw).unwrap();
    assert_eq!(message.sender_client_id, Some("viewer-1"));
    assert_eq!(message.message_type, MessageType::SdpOffer);
    assert_eq!(message.base64_payload, Some("eyJzZHAiOiJ2PTAifQ=="));
    assert!(message.status_response.is_none());
}

#[test]
fn test_parse_status_response() {
    let raw = br#"{
        "messageType": "STATUS_RESPONSE",
        "statusResponse": {
            "correlationId": "c-42",
            "errorType": "InvalidArgumentException",
            "statusCode": "400",
            "description": "bad recipient"
        }
    }"#;
    let message = parse_recv_message(raw).unwrap();
    let status = message.status_response.expect("status response");
    assert_eq!(message.message_type, MessageType::StatusResponse);
    assert_eq!(status.correlation_id, Some("c-42"));
    assert_eq!(status.error_type, Some("InvalidArgumentException"));
    assert_eq!(status.status_code, Some("400"));
    assert_eq!(status.description, Some("bad recipient"));
}

#[test]
fn test_status_response_shape_errors() {
    assert!(matches!(
        parse_recv_message(br#"{"statusResponse": "oops"}"#),
        Err(SignalError::NotExpectedResponse(_))
    ));
    assert!(matches!(
        parse_recv_message(br#"{"statusResponse": {"statusCode": 400}}"#),
        Err(SignalError::InvalidStatusResponse(_))
    ));
}

#[test]
fn test_parse_reconnect_ice_server() {
    let raw = br#"{
        "messageType": "RECONNECT_ICE_SERVER",
        "IceServerList": [
            {"Password": "p1", "Ttl": 300, "Uris": ["turn:a"], "Username": "u1"},
            {"Password": "p2", "Ttl": 300, "Uris": ["turn:b"], "Username": "u2"}
        ]
    }"#;
    let message = parse_recv_message(raw).unwrap();
    assert_eq!(message.message_type, MessageType::ReconnectIceServer);
    assert_eq!(message.ice_server_list.len(), 2);
    assert_eq!(message.ice_server_list.servers[1].uris, vec!["turn:b"]);
}

#[test]
fn test_unknown_message_type() {
    let message = parse_recv_message(br#"{"messageType": "SOMETHING_NEW", "extra": [1]}"#).unwrap();
    assert_eq!(message.message_type, MessageType::Unknown);
}

#[test]
fn test_parse_malformed() {
    assert!(matches!(
        parse_recv_message(b"{\"messageType\": "),
        Err(SignalError::InvalidJson(_))
    ));
    assert!(matches!(
        parse_recv_message(b"[]"),
        Err(SignalError::NotExpectedResponse(_))
    ));
}
