//! SDP text → [`SessionDescription`]
//!
//! Single pass over the tokenizer output. Where a line lands depends on its
//! type and on whether an `m=` line has been seen yet:
//!
//! | type | before any `m=`            | after an `m=`              |
//! |------|----------------------------|----------------------------|
//! | `m`  | opens a media block        | opens a media block        |
//! | `a`  | session attribute          | attribute of current media |
//! | `i`  | session information        | media title                |
//! | `c`  | session connection         | media connection           |
//! | `v s u e p` | session fields      | ignored                    |
//! | `o t` | session fields, best effort | ignored                   |
//! | other | ignored                   | ignored                    |
//!
//! Unknown line types are skipped so newer SDP producers stay readable.
//! `o=`, `t=` and `c=` are kept when they parse and fit; otherwise they are
//! skipped like any other line this parser does not interpret.

use tracing::{debug, trace};

use crate::model::*;
use crate::tokenizer::{self, SdpLine, SdpTokenizer};
use crate::{Result, SdpError};

/// Parse an SDP message
///
/// The first malformed line or capacity violation in a line this parser
/// requires aborts the parse; nothing partially filled is returned.
pub fn deserialize(sdp: &str) -> Result<SessionDescription> {
    let mut session = SessionDescription::new();

    for line in SdpTokenizer::new(sdp) {
        let line = line?;

        if line.kind == tokenizer::SDP_TYPE_MEDIA {
            let name = bounded_text(line.value, MAX_SDP_MEDIA_NAME_LENGTH)?;
            session.add_media(MediaDescription::new(name))?;
            continue;
        }

        match session.media_descriptions.last_mut() {
            Some(media) => parse_media_line(media, &line)?,
            None => parse_session_line(&mut session, &line)?,
        }
    }

    debug!(
        media = session.media_descriptions.len(),
        attributes = session.attributes.len(),
        "parsed session description"
    );

    Ok(session)
}

fn parse_session_line(session: &mut SessionDescription, line: &SdpLine<'_>) -> Result<()> {
    match line.kind {
        tokenizer::SDP_TYPE_VERSION => {
            session.version = parse_u64(line, line.value)?;
        }
        tokenizer::SDP_TYPE_ORIGINATOR => {
            if let Some(origin) = best_effort(line, parse_origin(line)) {
                session.origin = origin;
            }
        }
        tokenizer::SDP_TYPE_SESSION_NAME => {
            session.session_name = bounded_text(line.value, MAX_SDP_SESSION_NAME_LENGTH)?;
        }
        tokenizer::SDP_TYPE_SESSION_INFO => {
            session.session_information =
                bounded_text(line.value, MAX_SDP_SESSION_INFORMATION_LENGTH)?;
        }
        tokenizer::SDP_TYPE_URI => {
            session.uri = bounded_text(line.value, MAX_SDP_SESSION_URI_LENGTH)?;
        }
        tokenizer::SDP_TYPE_EMAIL => {
            session.email_address = bounded_text(line.value, MAX_SDP_SESSION_EMAIL_ADDRESS_LENGTH)?;
        }
        tokenizer::SDP_TYPE_PHONE => {
            session.phone_number = bounded_text(line.value, MAX_SDP_SESSION_PHONE_NUMBER_LENGTH)?;
        }
        tokenizer::SDP_TYPE_CONNINFO => {
            if let Some(connection) = best_effort(line, parse_connection(line, line.value)) {
                session.connection = connection;
            }
        }
        tokenizer::SDP_TYPE_TIME_ACTIVE => {
            if let Some(time) = best_effort(line, parse_time(line)) {
                best_effort(line, session.add_time_description(time));
            }
        }
        tokenizer::SDP_TYPE_ATTRIBUTE => {
            // Checked before splitting so a full session fails the same way
            // whatever the attribute looks like.
            if session.attributes.len() >= MAX_SDP_ATTRIBUTES_COUNT {
                return Err(SdpError::AttributeMaxExceeded(MAX_SDP_ATTRIBUTES_COUNT));
            }
            session.add_attribute(parse_attribute(line)?)?;
        }
        other => {
            trace!(line = line.number, kind = %other, "ignoring session line");
        }
    }
    Ok(())
}

fn parse_media_line(media: &mut MediaDescription, line: &SdpLine<'_>) -> Result<()> {
    match line.kind {
        tokenizer::SDP_TYPE_ATTRIBUTE => {
            if media.attributes.len() >= MAX_SDP_ATTRIBUTES_COUNT {
                return Err(SdpError::AttributeMaxExceeded(MAX_SDP_ATTRIBUTES_COUNT));
            }
            media.add_attribute(parse_attribute(line)?)?;
        }
        tokenizer::SDP_TYPE_SESSION_INFO => {
            media.media_title = bounded_text(line.value, MAX_SDP_MEDIA_TITLE_LENGTH)?;
        }
        tokenizer::SDP_TYPE_CONNINFO => {
            if let Some(connection) = best_effort(line, parse_connection(line, line.value)) {
                media.connection = connection;
            }
        }
        other => {
            trace!(line = line.number, kind = %other, "ignoring media line");
        }
    }
    Ok(())
}

/// Keep the value of an optional line, or log and skip the line
fn best_effort<T>(line: &SdpLine<'_>, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            trace!(line = line.number, kind = %line.kind, %err, "skipping line");
            None
        }
    }
}

fn parse_attribute(line: &SdpLine<'_>) -> Result<SdpAttribute> {
    let attribute = tokenizer::parse_attribute(line.value)
        .ok_or_else(|| SdpError::malformed(line.number, "attribute without a name"))?;
    SdpAttribute::bounded(attribute.name, attribute.value)
}

fn parse_u64(line: &SdpLine<'_>, text: &str) -> Result<u64> {
    text.parse::<u64>()
        .map_err(|_| SdpError::malformed(line.number, format!("not an unsigned integer: {:?}", text)))
}

/// `<nettype> <addrtype> <connection-address>`
fn parse_connection(line: &SdpLine<'_>, value: &str) -> Result<ConnectionInformation> {
    let mut fields = value.split(' ');
    let (Some(network_type), Some(address_type), Some(address), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(SdpError::malformed(line.number, "connection needs 3 fields"));
    };

    if network_type != NETWORK_TYPE_IN {
        return Err(SdpError::malformed(
            line.number,
            format!("unsupported network type {:?}", network_type),
        ));
    }
    if address_type != ADDRESS_TYPE_IP4 && address_type != ADDRESS_TYPE_IP6 {
        return Err(SdpError::malformed(
            line.number,
            format!("unsupported address type {:?}", address_type),
        ));
    }

    Ok(ConnectionInformation {
        network_type: bounded_text(network_type, MAX_SDP_NETWORK_TYPE_LENGTH)?,
        address_type: bounded_text(address_type, MAX_SDP_ADDRESS_TYPE_LENGTH)?,
        connection_address: bounded_text(address, MAX_SDP_CONNECTION_ADDRESS_LENGTH)?,
    })
}

/// `<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
fn parse_origin(line: &SdpLine<'_>) -> Result<SdpOrigin> {
    let mut fields = line.value.splitn(4, ' ');
    let (Some(user_name), Some(session_id), Some(session_version), Some(connection)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(SdpError::malformed(line.number, "origin needs 6 fields"));
    };

    Ok(SdpOrigin {
        user_name: bounded_text(user_name, MAX_SDP_SESSION_USERNAME_LENGTH)?,
        session_id: parse_u64(line, session_id)?,
        session_version: parse_u64(line, session_version)?,
        connection: parse_connection(line, connection)?,
    })
}

/// `<start-time> <stop-time>`
fn parse_time(line: &SdpLine<'_>) -> Result<TimeDescription> {
    let Some((start, stop)) = line.value.split_once(' ') else {
        return Err(SdpError::malformed(line.number, "time needs 2 fields"));
    };
    Ok(TimeDescription {
        start_time: parse_u64(line, start)?,
        stop_time: parse_u64(line, stop)?,
    })
}
