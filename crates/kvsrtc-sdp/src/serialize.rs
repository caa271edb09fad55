//! [`SessionDescription`] → SDP text
//!
//! Line order follows RFC 4566 §5:
//! ```text
//! v=  o=  s=  [i=] [u=] [e=] [p=] [c=]  t=*  a=*
//! m=  [i=] [c=]  a=*        (per media block)
//! ```
//! Bracketed lines are only written when the field is non-empty.

use kvsrtc_core::BoundedWriter;

use crate::model::*;
use crate::tokenizer::*;
use crate::{Result, SdpError};

/// Render `session` into `out`, returning the number of bytes written
///
/// The output is not NUL terminated. If `out` runs out of room at any line
/// the whole call fails with [`SdpError::BufferTooSmall`] and the buffer
/// content is unspecified. Text fields holding a line break are rejected with
/// [`SdpError::InvalidArg`] before anything is written.
pub fn serialize(session: &SessionDescription, out: &mut [u8]) -> Result<usize> {
    check_session(session)?;
    let mut w = BoundedWriter::new(out);

    write_line(&mut w, SDP_TYPE_VERSION, format_args!("{}", session.version))?;
    write_origin(&mut w, &session.origin)?;
    write_line(&mut w, SDP_TYPE_SESSION_NAME, format_args!("{}", session.session_name))?;
    write_optional(&mut w, SDP_TYPE_SESSION_INFO, &session.session_information)?;
    write_optional(&mut w, SDP_TYPE_URI, &session.uri)?;
    write_optional(&mut w, SDP_TYPE_EMAIL, &session.email_address)?;
    write_optional(&mut w, SDP_TYPE_PHONE, &session.phone_number)?;
    write_connection(&mut w, &session.connection)?;

    for time in &session.time_descriptions {
        write_line(
            &mut w,
            SDP_TYPE_TIME_ACTIVE,
            format_args!("{} {}", time.start_time, time.stop_time),
        )?;
    }

    for attribute in &session.attributes {
        write_attribute(&mut w, attribute)?;
    }

    for media in &session.media_descriptions {
        write_line(&mut w, SDP_TYPE_MEDIA, format_args!("{}", media.media_name))?;
        write_optional(&mut w, SDP_TYPE_SESSION_INFO, &media.media_title)?;
        write_connection(&mut w, &media.connection)?;
        for attribute in &media.attributes {
            write_attribute(&mut w, attribute)?;
        }
    }

    Ok(w.finish())
}

fn write_line(w: &mut BoundedWriter<'_>, kind: char, value: std::fmt::Arguments<'_>) -> Result<()> {
    w.put_fmt(format_args!("{}={}\r\n", kind, value))?;
    Ok(())
}

fn write_optional(w: &mut BoundedWriter<'_>, kind: char, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    write_line(w, kind, format_args!("{}", value))
}

fn check_text(field: &str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n']) {
        return Err(SdpError::InvalidArg(format!("{} contains a line break", field)));
    }
    Ok(())
}

fn check_connection_text(connection: &ConnectionInformation) -> Result<()> {
    check_text("network type", &connection.network_type)?;
    check_text("address type", &connection.address_type)?;
    check_text("connection address", &connection.connection_address)
}

fn check_attribute_text(attribute: &SdpAttribute) -> Result<()> {
    check_text("attribute name", &attribute.name)?;
    check_text("attribute value", attribute.value.as_deref().unwrap_or_default())
}

fn check_session(session: &SessionDescription) -> Result<()> {
    check_text("origin user name", &session.origin.user_name)?;
    check_connection_text(&session.origin.connection)?;
    check_text("session name", &session.session_name)?;
    check_text("session information", &session.session_information)?;
    check_text("uri", &session.uri)?;
    check_text("email address", &session.email_address)?;
    check_text("phone number", &session.phone_number)?;
    check_connection_text(&session.connection)?;
    session.attributes.iter().try_for_each(check_attribute_text)?;

    for media in &session.media_descriptions {
        check_text("media name", &media.media_name)?;
        check_text("media title", &media.media_title)?;
        check_connection_text(&media.connection)?;
        media.attributes.iter().try_for_each(check_attribute_text)?;
    }
    Ok(())
}

fn check_connection(connection: &ConnectionInformation) -> Result<()> {
    if connection.network_type != NETWORK_TYPE_IN {
        return Err(SdpError::InvalidArg(format!(
            "network type must be IN, got {:?}",
            connection.network_type
        )));
    }
    if connection.address_type != ADDRESS_TYPE_IP4 && connection.address_type != ADDRESS_TYPE_IP6 {
        return Err(SdpError::InvalidArg(format!(
            "address type must be IP4 or IP6, got {:?}",
            connection.address_type
        )));
    }
    Ok(())
}

fn write_origin(w: &mut BoundedWriter<'_>, origin: &SdpOrigin) -> Result<()> {
    check_connection(&origin.connection)?;
    write_line(
        w,
        SDP_TYPE_ORIGINATOR,
        format_args!(
            "{} {} {} {} {} {}",
            origin.user_name,
            origin.session_id,
            origin.session_version,
            origin.connection.network_type,
            origin.connection.address_type,
            origin.connection.connection_address
        ),
    )
}

fn write_connection(w: &mut BoundedWriter<'_>, connection: &ConnectionInformation) -> Result<()> {
    if connection.is_empty() {
        return Ok(());
    }
    check_connection(connection)?;
    write_line(
        w,
        SDP_TYPE_CONNINFO,
        format_args!(
            "{} {} {}",
            connection.network_type, connection.address_type, connection.connection_address
        ),
    )
}

fn write_attribute(w: &mut BoundedWriter<'_>, attribute: &SdpAttribute) -> Result<()> {
    match attribute.value.as_deref() {
        Some(value) if !value.is_empty() => write_line(
            w,
            SDP_TYPE_ATTRIBUTE,
            format_args!("{}:{}", attribute.name, value),
        ),
        _ => write_line(w, SDP_TYPE_ATTRIBUTE, format_args!("{}", attribute.name)),
    }
}
