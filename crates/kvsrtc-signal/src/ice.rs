//! ICE server lists
//!
//! The same `IceServerList` array appears in `GetIceServerConfig` responses
//! and in inbound `RECONNECT_ICE_SERVER` messages, and is rendered into
//! outbound `SDP_OFFER` messages.
//!
//! Parsing does not rely on object boundaries. Servers are split on key
//! repetition: a `Password`, `Ttl`, `Uris` or `Username` arriving for a server
//! that already has one starts the next server. Two well-formed objects
//! therefore give two servers, and an object repeating a key gives one server
//! per repetition. An empty `Uris` array leaves the server's URIs unset.
//! Servers past [`AWS_ICE_SERVER_MAX_NUM`] are dropped.

use kvsrtc_core::BoundedWriter;
use tracing::{debug, trace, warn};

use crate::json::{JsonType, JsonValue};
use crate::types::{IceServer, IceServerList};
use crate::{
    Result, SignalError, AWS_ICE_SERVER_MAX_NUM, AWS_ICE_SERVER_MAX_URIS,
    AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_BUFFER_MAX, AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_MAX,
    AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_MIN,
};

#[derive(Default)]
struct PendingServer<'a> {
    password: Option<&'a str>,
    ttl_seconds: Option<u32>,
    uris: Option<Vec<&'a str>>,
    username: Option<&'a str>,
}

impl<'a> PendingServer<'a> {
    fn is_empty(&self) -> bool {
        self.password.is_none()
            && self.ttl_seconds.is_none()
            && self.uris.is_none()
            && self.username.is_none()
    }

    fn into_server(self) -> IceServer<'a> {
        IceServer {
            password: self.password,
            ttl_seconds: self.ttl_seconds.unwrap_or_default(),
            uris: self.uris.unwrap_or_default(),
            username: self.username,
        }
    }
}

/// Parse an `IceServerList` array value
pub fn parse_ice_server_list<'a>(list: JsonValue<'a>) -> Result<IceServerList<'a>> {
    let mut servers: Vec<IceServer<'a>> = Vec::new();
    let mut pending = PendingServer::default();

    'elements: for element in list.elements()? {
        if !element.is(JsonType::Object) {
            trace!(kind = ?element.kind(), "skipping non-object ice server entry");
            continue;
        }

        for pair in element.pairs()? {
            let repeated = match pair.key.as_ref() {
                "Password" => pending.password.is_some(),
                "Ttl" => pending.ttl_seconds.is_some(),
                "Uris" => pending.uris.is_some(),
                "Username" => pending.username.is_some(),
                other => {
                    trace!(key = other, "ignoring ice server member");
                    continue;
                }
            };

            if repeated {
                servers.push(std::mem::take(&mut pending).into_server());
                if servers.len() == AWS_ICE_SERVER_MAX_NUM {
                    warn!(max = AWS_ICE_SERVER_MAX_NUM, "ice server list full, dropping the rest");
                    break 'elements;
                }
            }

            match pair.key.as_ref() {
                "Password" => pending.password = Some(pair.value.text()),
                "Ttl" => pending.ttl_seconds = Some(parse_ice_ttl(pair.value.text())?),
                "Uris" => {
                    pending.uris = Some(parse_uris(pair.value)?).filter(|uris| !uris.is_empty());
                }
                _ => pending.username = Some(pair.value.text()),
            }
        }
    }

    if !pending.is_empty() && servers.len() < AWS_ICE_SERVER_MAX_NUM {
        servers.push(pending.into_server());
    }

    debug!(servers = servers.len(), "parsed ice server list");
    Ok(IceServerList { servers })
}

fn parse_uris<'a>(value: JsonValue<'a>) -> Result<Vec<&'a str>> {
    let elements = value.elements()?;
    if elements.len() > AWS_ICE_SERVER_MAX_URIS {
        return Err(SignalError::InvalidIceServerUrisCount(elements.len()));
    }
    Ok(elements.iter().map(|uri| uri.text()).collect())
}

fn parse_ice_ttl(text: &str) -> Result<u32> {
    crate::response::parse_ttl(
        text,
        AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_BUFFER_MAX,
        AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_MIN..=AWS_MESSAGE_ICE_SERVER_TTL_SECONDS_MAX,
    )
}

/// Append `,\n\t"IceServerList": [...]` for an outbound message
pub(crate) fn write_ice_server_list(w: &mut BoundedWriter<'_>, list: &IceServerList<'_>) -> Result<()> {
    if list.len() > AWS_ICE_SERVER_MAX_NUM {
        return Err(SignalError::InvalidIceServerCount(list.len()));
    }

    w.put_str(",\n\t\"IceServerList\": [")?;
    for (i, server) in list.servers.iter().enumerate() {
        if server.uris.len() > AWS_ICE_SERVER_MAX_URIS {
            return Err(SignalError::InvalidIceServerUrisCount(server.uris.len()));
        }

        if i > 0 {
            w.put_str(",")?;
        }
        w.put_fmt(format_args!(
            "\n\t\t{{\n\t\t\t\"Password\": \"{}\",\n\t\t\t\"Ttl\": {},\n\t\t\t\"Uris\": [",
            server.password.unwrap_or_default(),
            server.ttl_seconds
        ))?;
        for (j, uri) in server.uris.iter().enumerate() {
            let sep = if j > 0 { "," } else { "" };
            w.put_fmt(format_args!("{}\n\t\t\t\t\"{}\"", sep, uri))?;
        }
        w.put_fmt(format_args!(
            "\n\t\t\t],\n\t\t\t\"Username\": \"{}\"\n\t\t}}",
            server.username.unwrap_or_default()
        ))?;
    }
    w.put_str("\n\t]")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<IceServerList<'_>> {
        let value = JsonValue::parse(input)?;
        parse_ice_server_list(value)
    }

    #[test]
    fn test_empty_list() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_repeated_key_in_one_object_splits() {
        let list = parse(r#"[{"Username": "a", "Password": "p", "Username": "b"}]"#).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.servers[0].username, Some("a"));
        assert_eq!(list.servers[0].password, Some("p"));
        assert_eq!(list.servers[1].username, Some("b"));
        assert_eq!(list.servers[1].password, None);
    }

    #[test]
    fn test_unknown_members_and_entries_skipped() {
        let list = parse(r#"[3, {"Realm": "x", "Ttl": 60}]"#).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.servers[0].ttl_seconds, 60);
    }

    #[test]
    fn test_empty_uris_do_not_split() {
        let list = parse(r#"[{"Username": "a", "Uris": [], "Uris": ["turn:a"]}]"#).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.servers[0].username, Some("a"));
        assert_eq!(list.servers[0].uris, vec!["turn:a"]);

        let list = parse(r#"[{"Uris": []}]"#).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_write_rejects_too_many_uris() {
        let list = IceServerList {
            servers: vec![IceServer {
                uris: vec!["turn:a"; AWS_ICE_SERVER_MAX_URIS + 1],
                ..Default::default()
            }],
        };
        let mut buf = [0u8; 1024];
        let mut w = BoundedWriter::with_terminator(&mut buf);
        assert_eq!(
            write_ice_server_list(&mut w, &list),
            Err(SignalError::InvalidIceServerUrisCount(5))
        );
    }
}
