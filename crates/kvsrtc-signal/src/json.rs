//! Borrowed JSON walking
//!
//! Responses are never deserialized into owned trees. [`JsonValue`] wraps a
//! validated [`RawValue`] slice of the input and hands out its members or
//! elements as further `JsonValue`s over sub-slices, so every string a parser
//! returns points into the caller's buffer.
//!
//! String values are returned without their quotes and with escape sequences
//! left as written. Signaling payloads are base64 and ARNs, which never carry
//! escapes.

use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserializer as _, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::{Result, SignalError};

/// Kind of a JSON value, read from its first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Object,
    Array,
    String,
    Number,
    True,
    False,
    Null,
}

/// A validated JSON value borrowed from the input
#[derive(Debug, Clone, Copy)]
pub struct JsonValue<'a> {
    raw: &'a RawValue,
}

/// One object member, in document order
#[derive(Debug, Clone)]
pub struct JsonPair<'a> {
    pub key: Cow<'a, str>,
    pub value: JsonValue<'a>,
}

/// Check that `input` is a single well-formed JSON document
pub fn validate(input: &[u8]) -> bool {
    parse_bytes(input).is_ok()
}

/// Parse raw bytes, rejecting anything that is not UTF-8 JSON
pub fn parse_bytes(input: &[u8]) -> Result<JsonValue<'_>> {
    let text = std::str::from_utf8(input)
        .map_err(|e| SignalError::InvalidJson(format!("not utf-8: {}", e)))?;
    JsonValue::parse(text)
}

impl<'a> JsonValue<'a> {
    pub fn parse(input: &'a str) -> Result<Self> {
        let raw: &'a RawValue = serde_json::from_str(input)?;
        Ok(Self { raw })
    }

    /// The value exactly as it appears in the input
    pub fn raw(&self) -> &'a str {
        self.raw.get()
    }

    pub fn kind(&self) -> JsonType {
        match self.raw().trim_start().as_bytes().first() {
            Some(b'{') => JsonType::Object,
            Some(b'[') => JsonType::Array,
            Some(b'"') => JsonType::String,
            Some(b't') => JsonType::True,
            Some(b'f') => JsonType::False,
            Some(b'n') => JsonType::Null,
            _ => JsonType::Number,
        }
    }

    pub fn is(&self, kind: JsonType) -> bool {
        self.kind() == kind
    }

    /// String contents without quotes, or the literal text of any other scalar
    pub fn text(&self) -> &'a str {
        let raw = self.raw().trim();
        match self.kind() {
            JsonType::String => raw
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(raw),
            _ => raw,
        }
    }

    /// Members of an object in document order, duplicates included
    pub fn pairs(&self) -> Result<Vec<JsonPair<'a>>> {
        if !self.is(JsonType::Object) {
            return Err(SignalError::NotExpectedResponse(format!(
                "expected an object, found {:?}",
                self.kind()
            )));
        }
        let mut de = serde_json::Deserializer::from_str(self.raw());
        let pairs = (&mut de).deserialize_map(PairsVisitor)?;
        de.end()?;
        Ok(pairs)
    }

    /// Elements of an array in document order
    pub fn elements(&self) -> Result<Vec<JsonValue<'a>>> {
        if !self.is(JsonType::Array) {
            return Err(SignalError::NotExpectedResponse(format!(
                "expected an array, found {:?}",
                self.kind()
            )));
        }
        let raws: Vec<&'a RawValue> = serde_json::from_str(self.raw())?;
        Ok(raws.into_iter().map(|raw| JsonValue { raw }).collect())
    }

    /// First member named `key`
    pub fn get(&self, key: &str) -> Result<Option<JsonValue<'a>>> {
        Ok(self
            .pairs()?
            .into_iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value))
    }
}

struct PairsVisitor;

impl<'de> Visitor<'de> for PairsVisitor {
    type Value = Vec<JsonPair<'de>>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<Key<'de>>()? {
            let raw: &'de RawValue = map.next_value()?;
            pairs.push(JsonPair {
                key: key.0,
                value: JsonValue { raw },
            });
        }
        Ok(pairs)
    }
}

/// Object key that borrows unless it contained escapes
struct Key<'a>(Cow<'a, str>);

impl<'de> Deserialize<'de> for Key<'de> {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = Key<'de>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object key")
            }

            fn visit_borrowed_str<E: de::Error>(self, v: &'de str) -> std::result::Result<Self::Value, E> {
                Ok(Key(Cow::Borrowed(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                Ok(Key(Cow::Owned(v.to_owned())))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
                Ok(Key(Cow::Owned(v)))
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}
