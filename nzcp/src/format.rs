// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Versioned body decoding.
//!
//! The version segment of a token selects a [`TokenFormat`]. A new revision of
//! the wire format is supported by registering another strategy.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use data_encoding::BASE32;
use nzcp_common::{parse_cose_sign1, ParsedCoseSign1};
use tracing::debug;

use crate::DecodeError;

/// Base-32 padding character.
pub const PADDING: char = '=';

/// A body segment decoded down to its COSE_Sign1 structure.
#[derive(Debug, Clone)]
pub struct DecodedBody {
    /// Bytes the COSE_Sign1 structure was parsed from.
    pub raw: Vec<u8>,
    pub parsed: ParsedCoseSign1,
}

/// One revision of the token body encoding.
pub trait TokenFormat: fmt::Debug + Send + Sync {
    /// Version segment this strategy handles (e.g. `"1"`).
    fn version(&self) -> &str;

    fn decode_body(&self, body: &str) -> Result<DecodedBody, DecodeError>;
}

/// Version 1: unpadded RFC 4648 base-32 of a COSE_Sign1 structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1Format;

impl TokenFormat for V1Format {
    fn version(&self) -> &str {
        "1"
    }

    fn decode_body(&self, body: &str) -> Result<DecodedBody, DecodeError> {
        let padded = restore_padding(body);
        let raw = BASE32
            .decode(padded.as_bytes())
            .map_err(|e| DecodeError::malformed(format!("invalid base-32 body: {e}")))?;
        debug!(body_len = body.len(), cose_len = raw.len(), "decoded base-32 body");

        let parsed = parse_cose_sign1(&raw).map_err(DecodeError::MalformedToken)?;
        Ok(DecodedBody { raw, parsed })
    }
}

/// Right-pad `body` with `=` to a multiple of 8 characters.
///
/// Appends `(8 - len % 8) % 8` characters, so an already padded body is returned unchanged.
pub fn restore_padding(body: &str) -> String {
    let missing = (8 - body.len() % 8) % 8;
    let mut padded = String::with_capacity(body.len() + missing);
    padded.push_str(body);
    padded.extend(std::iter::repeat(PADDING).take(missing));
    padded
}

/// Token formats by version segment.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: BTreeMap<String, Arc<dyn TokenFormat>>,
}

impl FormatRegistry {
    /// Registry with no formats.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every revision this crate ships.
    pub fn standard() -> Self {
        Self::empty().with_format(V1Format)
    }

    /// Add or replace the strategy for `format.version()`.
    pub fn with_format(mut self, format: impl TokenFormat + 'static) -> Self {
        self.register(Arc::new(format));
        self
    }

    pub fn register(&mut self, format: Arc<dyn TokenFormat>) {
        self.formats.insert(format.version().to_string(), format);
    }

    pub fn get(&self, version: &str) -> Option<&Arc<dyn TokenFormat>> {
        self.formats.get(version)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }
}
