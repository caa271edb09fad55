//! WebSocket message codec
//!
//! Outbound (client → service):
//! ```text
//! {
//!     "action": "SDP_OFFER",
//!     "RecipientClientId": "<id>",
//!     "MessagePayload": "<base64>",
//!     "CorrelationId": "<id>",          optional
//!     "IceServerList": [ ... ]          SDP_OFFER only
//! }
//! ```
//!
//! Inbound (service → client) carries `senderClientId`, `messageType`,
//! `messagePayload`, and for errors a `statusResponse` object. Key casing
//! differs between the two directions and must be kept as is.

use kvsrtc_core::BoundedWriter;
use tracing::{debug, trace};

use crate::ice::{parse_ice_server_list, write_ice_server_list};
use crate::json::{self, JsonType, JsonValue};
use crate::types::*;
use crate::{Result, SignalError};

/// Render `message` into `out`, returning the length written
///
/// One byte of `out` is kept back, so a message of exactly `out.len()`
/// bytes fails with [`SignalError::OutOfMemory`].
pub fn build_send_message(message: &WssSendMessage<'_>, out: &mut [u8]) -> Result<usize> {
    if message.base64_payload.is_empty() {
        return Err(SignalError::BadParam("base64_payload"));
    }

    let mut w = BoundedWriter::with_terminator(out);
    w.put_fmt(format_args!(
        "{{\n\t\"action\": \"{}\",\n\t\"RecipientClientId\": \"{}\",\n\t\"MessagePayload\": \"{}\"",
        message.message_type.as_action(),
        message.recipient_client_id,
        message.base64_payload
    ))?;

    if let Some(correlation_id) = message.correlation_id.filter(|id| !id.is_empty()) {
        w.put_fmt(format_args!(",\n\t\"CorrelationId\": \"{}\"", correlation_id))?;
    }

    if message.message_type == MessageType::SdpOffer && !message.ice_server_list.is_empty() {
        write_ice_server_list(&mut w, &message.ice_server_list)?;
    }

    w.put_str("\n}")?;
    let len = w.finish();

    debug!(action = message.message_type.as_action(), len, "built wss message");
    Ok(len)
}

/// Parse an inbound message
///
/// A single trailing NUL, as left by C-string producers, is ignored.
pub fn parse_recv_message(message: &[u8]) -> Result<WssRecvMessage<'_>> {
    let message = message.strip_suffix(b"\0").unwrap_or(message);
    let root = json::parse_bytes(message)?;

    let mut recv = WssRecvMessage::default();
    let mut status: Option<JsonValue<'_>> = None;

    for pair in root.pairs()? {
        match pair.key.as_ref() {
            "senderClientId" => recv.sender_client_id = Some(pair.value.text()),
            "messageType" => recv.message_type = MessageType::from_wire(pair.value.text()),
            "messagePayload" => recv.base64_payload = Some(pair.value.text()),
            "statusResponse" => {
                if !pair.value.is(JsonType::Object) {
                    return Err(SignalError::NotExpectedResponse(format!(
                        "statusResponse is {:?}",
                        pair.value.kind()
                    )));
                }
                status = Some(pair.value);
            }
            "IceServerList" => {
                recv.ice_server_list = parse_ice_server_list(pair.value)?;
            }
            other => trace!(key = other, "ignoring wss message member"),
        }
    }

    if let Some(status) = status {
        recv.status_response = Some(parse_status_response(status)?);
    }

    debug!(message_type = ?recv.message_type, "parsed wss message");
    Ok(recv)
}

fn parse_status_response(status: JsonValue<'_>) -> Result<WssStatusResponse<'_>> {
    let mut response = WssStatusResponse::default();
    for pair in status.pairs()? {
        let slot = match pair.key.as_ref() {
            "correlationId" => &mut response.correlation_id,
            "errorType" => &mut response.error_type,
            "statusCode" => &mut response.status_code,
            "description" => &mut response.description,
            _ => continue,
        };
        if !pair.value.is(JsonType::String) {
            return Err(SignalError::InvalidStatusResponse(format!(
                "{} is {:?}",
                pair.key,
                pair.value.kind()
            )));
        }
        *slot = Some(pair.value.text());
    }
    Ok(response)
}
