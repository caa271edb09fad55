//! Line tokenizer for SDP text
//!
//! An SDP body is a sequence of `<type>=<value>` lines:
//! ```text
//! v=0
//! o=- 4611731400430051336 2 IN IP4 127.0.0.1
//! s=-
//! t=0 0
//! m=audio 9 UDP/TLS/RTP/SAVPF 111
//! a=rtpmap:111 opus/48000/2
//! ```
//!
//! Lines end with CRLF; a bare LF is accepted as well, and the last line may
//! omit its terminator. The tokenizer only splits; it knows nothing about the
//! meaning of any type character.

use crate::{Result, SdpError};

pub const SDP_TYPE_VERSION: char = 'v';
pub const SDP_TYPE_ORIGINATOR: char = 'o';
pub const SDP_TYPE_SESSION_NAME: char = 's';
pub const SDP_TYPE_SESSION_INFO: char = 'i';
pub const SDP_TYPE_URI: char = 'u';
pub const SDP_TYPE_EMAIL: char = 'e';
pub const SDP_TYPE_PHONE: char = 'p';
pub const SDP_TYPE_CONNINFO: char = 'c';
pub const SDP_TYPE_TIME_ACTIVE: char = 't';
pub const SDP_TYPE_ATTRIBUTE: char = 'a';
pub const SDP_TYPE_MEDIA: char = 'm';

/// One `<type>=<value>` record, borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdpLine<'a> {
    /// 1-based line number, for error reporting
    pub number: usize,
    pub kind: char,
    pub value: &'a str,
}

/// Pull-based iterator over the lines of an SDP message
///
/// Yields `Some(Ok(line))` per record, `Some(Err(_))` for a line that is not
/// of the form `x=...`, and `None` at the end of the message.
#[derive(Debug, Clone)]
pub struct SdpTokenizer<'a> {
    rest: &'a str,
    line: usize,
    failed: bool,
}

impl<'a> SdpTokenizer<'a> {
    pub fn new(sdp: &'a str) -> Self {
        Self {
            rest: sdp,
            line: 0,
            failed: false,
        }
    }

    fn next_raw_line(&mut self) -> &'a str {
        let (line, rest) = match self.rest.find('\n') {
            Some(pos) => (&self.rest[..pos], &self.rest[pos + 1..]),
            None => (self.rest, ""),
        };
        self.rest = rest;
        self.line += 1;
        line.strip_suffix('\r').unwrap_or(line)
    }
}

impl<'a> Iterator for SdpTokenizer<'a> {
    type Item = Result<SdpLine<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }

        let raw = self.next_raw_line();
        let mut chars = raw.chars();
        let kind = chars.next();
        let equals = chars.next();

        match (kind, equals) {
            (Some(kind), Some('=')) if kind.is_ascii_alphabetic() => Some(Ok(SdpLine {
                number: self.line,
                kind,
                value: &raw[2..],
            })),
            _ => {
                self.failed = true;
                Some(Err(SdpError::malformed(
                    self.line,
                    format!("expected <type>=<value>, got {:?}", raw),
                )))
            }
        }
    }
}

/// An attribute line split into name and optional value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRef<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

/// Split an `a=` value on its first `:`
///
/// `rtpmap:111 opus/48000/2` gives name `rtpmap` and value `111 opus/48000/2`;
/// `sendrecv` gives a name with no value.
pub fn parse_attribute(value: &str) -> Option<AttributeRef<'_>> {
    let (name, value) = match value.split_once(':') {
        Some((name, value)) => (name, Some(value)),
        None => (value, None),
    };

    if name.is_empty() {
        return None;
    }

    Some(AttributeRef { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_crlf_and_lf() {
        let lines: Vec<_> = SdpTokenizer::new("v=0\r\ns=-\nt=0 0")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, 'v');
        assert_eq!(lines[0].value, "0");
        assert_eq!(lines[1].value, "-");
        assert_eq!(lines[2].value, "0 0");
        assert_eq!(lines[2].number, 3);
    }

    #[test]
    fn test_empty_value_allowed() {
        let line = SdpTokenizer::new("s=\r\n").next().unwrap().unwrap();
        assert_eq!(line.kind, 's');
        assert_eq!(line.value, "");
    }

    #[test]
    fn test_malformed_line_stops_iteration() {
        let mut tokenizer = SdpTokenizer::new("v=0\r\ngarbage\r\ns=-\r\n");
        assert!(tokenizer.next().unwrap().is_ok());
        let err = tokenizer.next().unwrap().unwrap_err();
        assert!(matches!(err, SdpError::MalformedSdp { line: 2, .. }));
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_empty_input_is_end_of_message() {
        assert!(SdpTokenizer::new("").next().is_none());
    }

    #[test]
    fn test_parse_attribute_first_colon_only() {
        let attr = parse_attribute("fingerprint:sha-256 AB:CD:EF").unwrap();
        assert_eq!(attr.name, "fingerprint");
        assert_eq!(attr.value, Some("sha-256 AB:CD:EF"));

        let attr = parse_attribute("rtcp-mux").unwrap();
        assert_eq!(attr.name, "rtcp-mux");
        assert_eq!(attr.value, None);

        assert!(parse_attribute(":orphan").is_none());
    }
}
