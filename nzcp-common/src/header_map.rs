// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CBOR value model shared by COSE headers and pass claims.

use std::collections::BTreeMap;

use minicbor::data::Type;
use minicbor::Decoder;

/// Nested arrays/maps deeper than this are rejected instead of recursing further.
pub const MAX_NESTING_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClaimKey {
    /// Integer label (COSE header labels, CWT claim keys).
    Int(i64),
    /// Text label (`"vc"`, `"credentialSubject"`, ...).
    Text(String),
}

impl From<i64> for ClaimKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ClaimKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl std::fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimKey::Int(i) => write!(f, "{i}"),
            ClaimKey::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<ClaimValue>),
    Map(BTreeMap<ClaimKey, ClaimValue>),
    Bool(bool),
    Null,
    Undefined,
    /// Unassigned CBOR simple value.
    Simple(u8),
    /// Any float width, widened.
    Float(f64),
    /// A CBOR tagged item, e.g. tag 1 (epoch time) around a timestamp.
    Tagged(u64, Box<ClaimValue>),
}

impl ClaimValue {
    /// Integer value, looking through any tag.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Int(i) => Some(*i),
            ClaimValue::Tagged(_, inner) => inner.as_i64(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ClaimValue::Bytes(b) => Some(b.as_slice()),
            ClaimValue::Tagged(_, inner) => inner.as_bytes(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ClaimValue::Text(s) => Some(s.as_str()),
            ClaimValue::Tagged(_, inner) => inner.as_text(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<ClaimKey, ClaimValue>> {
        match self {
            ClaimValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// A decoded CBOR map together with the exact bytes it was decoded from.
///
/// Signatures cover the original encoding of the protected header and the
/// payload, so those bytes are kept as-is and never re-encoded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CborMap {
    encoded: Vec<u8>,
    map: BTreeMap<ClaimKey, ClaimValue>,
}

impl CborMap {
    /// Map decoded out of a byte string (protected header, payload).
    pub fn from_encoded(encoded: Vec<u8>, map: BTreeMap<ClaimKey, ClaimValue>) -> Self {
        Self { encoded, map }
    }

    /// Map carried inline in the enclosing structure (unprotected header).
    pub fn inline(map: BTreeMap<ClaimKey, ClaimValue>) -> Self {
        Self {
            encoded: Vec::new(),
            map,
        }
    }

    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    pub fn map(&self) -> &BTreeMap<ClaimKey, ClaimValue> {
        &self.map
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, key: &ClaimKey) -> Option<&ClaimValue> {
        self.map.get(key)
    }

    pub fn get_label(&self, label: i64) -> Option<&ClaimValue> {
        self.map.get(&ClaimKey::Int(label))
    }

    pub fn get_named(&self, name: &str) -> Option<&ClaimValue> {
        self.map.get(&ClaimKey::Text(name.to_string()))
    }

    pub fn get_i64(&self, label: i64) -> Option<i64> {
        self.get_label(label).and_then(ClaimValue::as_i64)
    }

    pub fn get_bytes(&self, label: i64) -> Option<&[u8]> {
        self.get_label(label).and_then(ClaimValue::as_bytes)
    }
}

/// Decode a byte string that must contain exactly one CBOR map.
pub fn decode_map_from_cbor(bytes: &[u8]) -> Result<BTreeMap<ClaimKey, ClaimValue>, String> {
    // Empty bstr means empty map for protected headers.
    if bytes.is_empty() {
        return Ok(BTreeMap::new());
    }

    let mut dec = Decoder::new(bytes);
    if !matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Map | Type::MapIndef) {
        return Err("expected map".to_string());
    }

    let map = decode_map_from_decoder(&mut dec)?;

    if dec.position() != bytes.len() {
        return Err("trailing bytes after map".to_string());
    }

    Ok(map)
}

pub fn decode_map_from_decoder(dec: &mut Decoder<'_>) -> Result<BTreeMap<ClaimKey, ClaimValue>, String> {
    decode_map_entries(dec, 0)
}

fn decode_map_entries(dec: &mut Decoder<'_>, depth: usize) -> Result<BTreeMap<ClaimKey, ClaimValue>, String> {
    let len = dec
        .map()
        .map_err(|e| format!("failed to read map: {e}"))?
        .ok_or_else(|| "indefinite-length maps are not supported".to_string())?;

    let mut map = BTreeMap::new();
    for _ in 0..len {
        let key = decode_key(dec)?;
        let value = decode_value(dec, depth + 1)?;
        map.insert(key, value);
    }
    Ok(map)
}

fn decode_key(dec: &mut Decoder<'_>) -> Result<ClaimKey, String> {
    match dec.datatype().map_err(|e| e.to_string())? {
        Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int
        | Type::U8
        | Type::U16
        | Type::U32
        | Type::U64 => {
            let i = dec
                .i64()
                .map_err(|e| format!("failed to decode int map key: {e}"))?;
            Ok(ClaimKey::Int(i))
        }
        Type::String => {
            let s = dec
                .str()
                .map_err(|e| format!("failed to decode text map key: {e}"))?;
            Ok(ClaimKey::Text(s.to_string()))
        }
        Type::StringIndef => Ok(ClaimKey::Text(decode_indefinite_text(dec)?)),
        other => Err(format!("unsupported map key type: {other:?}")),
    }
}

fn decode_value(dec: &mut Decoder<'_>, depth: usize) -> Result<ClaimValue, String> {
    if depth > MAX_NESTING_DEPTH {
        return Err("nesting depth exceeded".to_string());
    }

    match dec.datatype().map_err(|e| e.to_string())? {
        Type::Null => {
            dec.null().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Null)
        }
        Type::Undefined => {
            dec.undefined().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Undefined)
        }
        Type::Simple => {
            let v = dec.simple().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Simple(v))
        }
        Type::Bool => {
            let b = dec.bool().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Bool(b))
        }
        Type::Bytes => {
            let b = dec.bytes().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Bytes(b.to_vec()))
        }
        Type::BytesIndef => {
            let mut out = Vec::new();
            for chunk in dec.bytes_iter().map_err(|e| e.to_string())? {
                out.extend_from_slice(chunk.map_err(|e| format!("bad byte string chunk: {e}"))?);
            }
            Ok(ClaimValue::Bytes(out))
        }
        Type::String => {
            let s = dec.str().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Text(s.to_string()))
        }
        Type::StringIndef => Ok(ClaimValue::Text(decode_indefinite_text(dec)?)),
        Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int
        | Type::U8
        | Type::U16
        | Type::U32
        | Type::U64 => {
            let i = dec.i64().map_err(|e| format!("integer out of range: {e}"))?;
            Ok(ClaimValue::Int(i))
        }
        Type::F16 => {
            let f = dec.f16().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Float(f64::from(f)))
        }
        Type::F32 => {
            let f = dec.f32().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Float(f64::from(f)))
        }
        Type::F64 => {
            let f = dec.f64().map_err(|e| e.to_string())?;
            Ok(ClaimValue::Float(f))
        }
        Type::Tag => {
            let tag = dec.tag().map_err(|e| format!("failed to read tag: {e}"))?;
            let inner = decode_value(dec, depth + 1)?;
            Ok(ClaimValue::Tagged(tag.as_u64(), Box::new(inner)))
        }
        Type::Array => {
            let len = dec
                .array()
                .map_err(|e| format!("failed to read array: {e}"))?
                .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;
            // Declared length is untrusted.
            let mut out = Vec::with_capacity(len.min(64) as usize);
            for _ in 0..len {
                out.push(decode_value(dec, depth + 1)?);
            }
            Ok(ClaimValue::Array(out))
        }
        Type::Map => Ok(ClaimValue::Map(decode_map_entries(dec, depth)?)),
        other => Err(format!("unsupported value type: {other:?}")),
    }
}

/// Concatenate the chunks of an indefinite-length text string.
fn decode_indefinite_text(dec: &mut Decoder<'_>) -> Result<String, String> {
    let mut out = String::new();
    for chunk in dec.str_iter().map_err(|e| e.to_string())? {
        out.push_str(chunk.map_err(|e| format!("bad text string chunk: {e}"))?);
    }
    Ok(out)
}
