// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use nzcp_common::{CborMap, ClaimKey, ClaimValue, ParsedCoseSign1, SignableContent};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::claims::PassClaims;
use crate::settings::{DecoderSettings, SEGMENT_DELIMITER};
use crate::DecodeError;

const JSON_TEXT_KEY_ESCAPE: char = '~';

/// A decoded NZ COVID Pass.
///
/// Construction fails unless the token has the expected prefix, a registered
/// version, a well-formed COSE_Sign1 body and a key identifier. All accessors
/// are pure reads of the decoded state.
#[derive(Debug, Clone)]
pub struct Envelope {
    encoded_text: String,
    version: String,
    raw: Vec<u8>,
    parsed: ParsedCoseSign1,
}

impl Envelope {
    /// Decode with the standard `NZCP:` prefix and version registry.
    pub fn decode(token: &str) -> Result<Self, DecodeError> {
        Self::decode_with(token, &DecoderSettings::default())
    }

    pub fn decode_with(token: &str, settings: &DecoderSettings) -> Result<Self, DecodeError> {
        let segments: Vec<&str> = token.split(SEGMENT_DELIMITER).collect();
        let [prefix, version, body] = segments.as_slice() else {
            return Err(DecodeError::malformed(format!(
                "expected 3 '{SEGMENT_DELIMITER}'-separated segments, found {}",
                segments.len()
            )));
        };

        if *prefix != settings.prefix() {
            return Err(DecodeError::malformed(format!(
                "expected prefix {:?}, found {prefix:?}",
                settings.prefix()
            )));
        }

        let format = match settings.registry().get(version) {
            Some(format) => format,
            None if !version.is_empty() && version.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(DecodeError::UnsupportedVersion((*version).to_string()));
            }
            None => {
                return Err(DecodeError::malformed(format!("invalid version segment {version:?}")));
            }
        };

        let decoded = format.decode_body(body)?;
        if decoded.parsed.key_identifier().is_none() {
            return Err(DecodeError::MissingKeyIdentifier);
        }

        debug!(version = %version, claims = decoded.parsed.payload.map().len(), "decoded pass");

        Ok(Self {
            encoded_text: token.to_string(),
            version: (*version).to_string(),
            raw: decoded.raw,
            parsed: decoded.parsed,
        })
    }

    pub fn protected_header(&self) -> &CborMap {
        &self.parsed.protected_headers
    }

    pub fn unprotected_header(&self) -> &CborMap {
        &self.parsed.unprotected_headers
    }

    /// The CWT claims document, with its original encoding.
    pub fn payload(&self) -> &CborMap {
        &self.parsed.payload
    }

    pub fn claims(&self) -> &BTreeMap<ClaimKey, ClaimValue> {
        self.parsed.payload.map()
    }

    /// Typed view over the well-known pass claims.
    pub fn pass_claims(&self) -> PassClaims<'_> {
        PassClaims::new(&self.parsed.payload)
    }

    pub fn signature(&self) -> &[u8] {
        &self.parsed.signature
    }

    /// Key identifier (header label 4), protected header first.
    pub fn key_identifier(&self) -> Result<&[u8], DecodeError> {
        self.parsed.key_identifier().ok_or(DecodeError::MissingKeyIdentifier)
    }

    /// Key identifier as text, the form key sets are indexed by.
    pub fn key_identifier_text(&self) -> Result<String, DecodeError> {
        self.key_identifier().map(nzcp_validation::key_set_index)
    }

    /// Raw `alg` entry of the protected header, not validated.
    pub fn signing_algorithm(&self) -> Option<&ClaimValue> {
        self.parsed.algorithm()
    }

    /// Sig_structure over the original protected header and payload bytes.
    pub fn signable_content(&self) -> SignableContent {
        self.parsed.signable_content()
    }

    /// COSE_Sign1 bytes the body decoded to.
    pub fn raw_cose(&self) -> &[u8] {
        &self.raw
    }

    /// The token string exactly as given to [`Self::decode`].
    pub fn encoded_text(&self) -> &str {
        &self.encoded_text
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// JSON rendering for display. Byte strings become lowercase hex.
    ///
    /// Integer map keys render as plain decimal. Text keys that would read as an
    /// integer, or that start with `~`, get a leading `~`, so no two keys collide.
    pub fn to_json(&self) -> Value {
        json!({
            "version": self.version,
            "protected": map_to_json(self.protected_header().map()),
            "unprotected": map_to_json(self.unprotected_header().map()),
            "payload": map_to_json(self.claims()),
            "signature": hex::encode(self.signature()),
        })
    }
}

fn map_to_json(map: &BTreeMap<ClaimKey, ClaimValue>) -> Value {
    let out: Map<String, Value> = map.iter().map(|(k, v)| (json_key(k), value_to_json(v))).collect();
    Value::Object(out)
}

fn json_key(key: &ClaimKey) -> String {
    match key {
        ClaimKey::Int(i) => i.to_string(),
        ClaimKey::Text(s) if s.starts_with(JSON_TEXT_KEY_ESCAPE) || s.parse::<i64>().is_ok() => {
            format!("{JSON_TEXT_KEY_ESCAPE}{s}")
        }
        ClaimKey::Text(s) => s.clone(),
    }
}

fn value_to_json(value: &ClaimValue) -> Value {
    match value {
        ClaimValue::Int(i) => Value::from(*i),
        ClaimValue::Bytes(b) => Value::String(hex::encode(b)),
        ClaimValue::Text(s) => Value::String(s.clone()),
        ClaimValue::Array(items) => Value::Array(items.iter().map(value_to_json).collect()),
        ClaimValue::Map(m) => map_to_json(m),
        ClaimValue::Bool(b) => Value::Bool(*b),
        ClaimValue::Null | ClaimValue::Undefined => Value::Null,
        ClaimValue::Simple(v) => Value::from(*v),
        // NaN and infinities have no JSON form.
        ClaimValue::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        ClaimValue::Tagged(_, inner) => value_to_json(inner),
    }
}
