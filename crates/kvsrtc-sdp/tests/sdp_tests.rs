//! SDP deserialize/serialize tests for kvsrtc-sdp

use kvsrtc_sdp::{
    deserialize, serialize, ConnectionInformation, MediaDescription, SdpAttribute, SdpError,
    SdpOrigin, SessionDescription, TimeDescription, MAX_SDP_ATTRIBUTES_COUNT,
};

const BROWSER_OFFER: &str = "v=0\r\n\
o=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n\
s=-\r\n\
t=0 0\r\n\
a=group:BUNDLE 0 1\r\n\
a=extmap-allow-mixed\r\n\
a=msid-semantic: WMS\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 111 63\r\n\
c=IN IP4 0.0.0.0\r\n\
a=rtcp:9 IN IP4 0.0.0.0\r\n\
a=ice-ufrag:EsAw\r\n\
a=ice-pwd:P2uYro0UCOQ4zxjKXaWCBui1\r\n\
a=fingerprint:sha-256 D2:FA:0E:C3:22:59:5E:14:95:69:92:3D:13:B4:84:24:2C:C2:A2:C0:3E:FD:34:8E:5E:EA:6F:AF:52:CE:E6:0F\r\n\
a=setup:actpass\r\n\
a=mid:0\r\n\
a=sendrecv\r\n\
a=rtcp-mux\r\n\
a=rtpmap:111 opus/48000/2\r\n\
m=video 9 UDP/TLS/RTP/SAVPF 96\r\n\
c=IN IP4 0.0.0.0\r\n\
a=mid:1\r\n\
a=recvonly\r\n\
a=rtpmap:96 VP8/90000\r\n";

#[test]
fn test_parse_browser_offer() {
    let session = deserialize(BROWSER_OFFER).expect("parse failed");

    assert_eq!(session.version, 0);
    assert_eq!(session.origin.session_id, 4611731400430051336);
    assert_eq!(session.origin.session_version, 2);
    assert_eq!(session.origin.connection.connection_address, "127.0.0.1");
    assert_eq!(session.session_name, "-");
    assert_eq!(session.time_descriptions, vec![TimeDescription::default()]);

    assert_eq!(session.attributes.len(), 3);
    assert_eq!(session.attributes[0].name, "group");
    assert_eq!(session.attributes[0].value.as_deref(), Some("BUNDLE 0 1"));
    assert_eq!(session.attributes[1].value, None);
    assert_eq!(session.attributes[2].value.as_deref(), Some(" WMS"));

    assert_eq!(session.media_descriptions.len(), 2);
    let audio = &session.media_descriptions[0];
    assert_eq!(audio.media_name, "audio 9 UDP/TLS/RTP/SAVPF 111 63");
    assert_eq!(audio.connection, ConnectionInformation::new("IN", "IP4", "0.0.0.0"));
    assert_eq!(audio.attributes.len(), 9);
    assert_eq!(audio.attribute("mid").and_then(|a| a.value.as_deref()), Some("0"));
    assert!(audio
        .attribute("fingerprint")
        .and_then(|a| a.value.as_deref())
        .unwrap()
        .starts_with("sha-256 D2:FA"));

    let video = &session.media_descriptions[1];
    assert_eq!(video.attribute("recvonly"), Some(&SdpAttribute::new("recvonly", None)));
}

#[test]
fn test_browser_offer_round_trip_is_byte_exact() {
    let session = deserialize(BROWSER_OFFER).expect("parse failed");
    let mut buf = vec![0u8; 4096];
    let len = serialize(&session, &mut buf).expect("serialize failed");
    assert_eq!(std::str::from_utf8(&buf[..len]).unwrap(), BROWSER_OFFER);
}

#[test]
fn test_model_round_trip() {
    let mut session = SessionDescription {
        version: 0,
        origin: SdpOrigin {
            user_name: "alice".into(),
            session_id: 2890844526,
            session_version: 2890842807,
            connection: ConnectionInformation::new("IN", "IP6", "fe80::1"),
        },
        session_name: "SDP Seminar".into(),
        session_information: "A Seminar on the session description protocol".into(),
        uri: "http://www.example.com/seminars/sdp.pdf".into(),
        email_address: "j.doe@example.com (Jane Doe)".into(),
        phone_number: "+1 617 555-6011".into(),
        connection: ConnectionInformation::new("IN", "IP4", "224.2.17.12/127"),
        ..Default::default()
    };
    session
        .add_time_description(TimeDescription { start_time: 2873397496, stop_time: 2873404696 })
        .unwrap();
    session.add_attribute(SdpAttribute::new("recvonly", None)).unwrap();

    let media = session.add_media(MediaDescription::new("audio 49170 RTP/AVP 0")).unwrap();
    media.media_title = "main audio".into();
    media.add_attribute(SdpAttribute::new("ptime", Some("20"))).unwrap();

    let media = session.add_media(MediaDescription::new("video 51372 RTP/AVP 99")).unwrap();
    media.connection = ConnectionInformation::new("IN", "IP4", "10.0.0.7");
    media.add_attribute(SdpAttribute::new("rtpmap", Some("99 h263-1998/90000"))).unwrap();

    let mut buf = vec![0u8; 2048];
    let len = serialize(&session, &mut buf).unwrap();
    let text = std::str::from_utf8(&buf[..len]).unwrap();
    let parsed = deserialize(text).unwrap();

    assert_eq!(parsed, session);
}

#[test]
fn test_session_attribute_limit() {
    let mut sdp = String::from("v=0\r\n");
    for i in 0..MAX_SDP_ATTRIBUTES_COUNT {
        sdp.push_str(&format!("a=x-{}\r\n", i));
    }
    assert_eq!(
        deserialize(&sdp).unwrap().attributes.len(),
        MAX_SDP_ATTRIBUTES_COUNT
    );

    sdp.push_str("a=one-too-many\r\n");
    assert_eq!(
        deserialize(&sdp),
        Err(SdpError::AttributeMaxExceeded(MAX_SDP_ATTRIBUTES_COUNT))
    );
}

#[test]
fn test_media_attribute_limit_is_per_block() {
    let mut sdp = String::from("v=0\r\nm=audio 9 RTP/AVP 0\r\n");
    for _ in 0..MAX_SDP_ATTRIBUTES_COUNT {
        sdp.push_str("a=rtcp-mux\r\n");
    }
    sdp.push_str("m=video 9 RTP/AVP 96\r\na=rtcp-mux\r\n");
    let session = deserialize(&sdp).unwrap();
    assert_eq!(session.media_descriptions[1].attributes.len(), 1);

    sdp.insert_str(sdp.find("m=video").unwrap(), "a=rtcp-mux\r\n");
    assert_eq!(
        deserialize(&sdp),
        Err(SdpError::AttributeMaxExceeded(MAX_SDP_ATTRIBUTES_COUNT))
    );
}

#[test]
fn test_unparsable_optional_lines_do_not_fail() {
    for sdp in [
        "v=0\r\nt=0 0\r\nt=1 2\r\nt=3 4\r\n",
        "v=0\r\nt=0\r\n",
        "v=0\r\no=- x 2 IN IP4 127.0.0.1\r\n",
        "v=0\r\nc=IN\r\n",
        "v=0\r\nm=audio 9 RTP/AVP 0\r\nc=IN IP7 1.2.3.4\r\n",
    ] {
        assert!(deserialize(sdp).is_ok(), "expected {:?} to parse", sdp);
    }
}

#[test]
fn test_malformed_lines() {
    for sdp in [
        "v=0\r\nnot an sdp line\r\n",
        "v=0\r\n\r\ns=-\r\n",
        "v=0\r\na=\r\n",
        "v=-1\r\n",
    ] {
        assert!(
            matches!(deserialize(sdp), Err(SdpError::MalformedSdp { .. })),
            "expected MalformedSdp for {:?}",
            sdp
        );
    }
}

#[test]
fn test_serialize_buffer_too_small_at_every_length() {
    let session = deserialize(BROWSER_OFFER).unwrap();
    for size in [0, 1, 5, 40, BROWSER_OFFER.len() - 1] {
        let mut buf = vec![0u8; size];
        assert!(
            matches!(serialize(&session, &mut buf), Err(SdpError::BufferTooSmall { .. })),
            "size {} should not fit",
            size
        );
    }
}

#[test]
fn test_serialize_rejects_bad_media_connection() {
    let mut session = deserialize(BROWSER_OFFER).unwrap();
    session.media_descriptions[1].connection.address_type = "IP5".into();
    let mut buf = vec![0u8; 4096];
    assert!(matches!(serialize(&session, &mut buf), Err(SdpError::InvalidArg(_))));
}
