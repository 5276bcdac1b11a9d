// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use minicbor::data::Tag;
use minicbor::data::Type;
use minicbor::{Decoder, Encoder};

use crate::header_map::{decode_map_from_cbor, decode_map_from_decoder, CborMap, ClaimValue};
use crate::signable::SignableContent;

pub const COSE_SIGN1_TAG: u64 = 18;
pub const SIG_STRUCTURE_CONTEXT_SIGNATURE1: &str = "Signature1";

/// COSE header label for the signing algorithm.
pub const HEADER_ALG: i64 = 1;
/// COSE header label for the key identifier.
pub const HEADER_KID: i64 = 4;

#[derive(Debug, Clone, Default)]
pub struct ParsedCoseSign1 {
    pub protected_headers: CborMap,
    pub unprotected_headers: CborMap,
    /// Claims decoded from the payload bstr; `encoded()` holds the original bytes.
    pub payload: CborMap,
    pub signature: Vec<u8>,
    /// Sig_structure over the original protected header and payload bytes.
    pub to_be_signed: Vec<u8>,
}

impl ParsedCoseSign1 {
    /// Key identifier from the protected header, falling back to the unprotected one.
    pub fn key_identifier(&self) -> Option<&[u8]> {
        self.protected_headers
            .get_bytes(HEADER_KID)
            .or_else(|| self.unprotected_headers.get_bytes(HEADER_KID))
    }

    /// Raw `alg` value as carried in the protected header.
    pub fn algorithm(&self) -> Option<&ClaimValue> {
        self.protected_headers.get_label(HEADER_ALG)
    }

    pub fn signable_content(&self) -> SignableContent {
        SignableContent {
            to_be_signed: self.to_be_signed.clone(),
            signature: self.signature.clone(),
            algorithm: self.algorithm().and_then(ClaimValue::as_i64),
        }
    }
}

pub fn parse_cose_sign1(input: &[u8]) -> Result<ParsedCoseSign1, String> {
    if input.is_empty() {
        return Err("empty input".to_string());
    }

    let mut dec = Decoder::new(input);

    // Optional COSE_Sign1 tag (18)
    if matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Tag) {
        let tag = dec.tag().map_err(|e| format!("failed to read CBOR tag: {e}"))?;
        if tag != Tag::new(COSE_SIGN1_TAG) {
            return Err("unexpected CBOR tag (expected COSE_Sign1 tag 18 or no tag)".to_string());
        }
    }

    if !matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Array) {
        return Err("top-level item is not an array".to_string());
    }

    let len = dec
        .array()
        .map_err(|e| format!("top-level item is not an array: {e}"))?
        .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;

    if len != 4 {
        return Err(format!("array length was {len}, expected 4"));
    }

    // protected headers (bstr)
    let protected_bstr = dec
        .bytes()
        .map_err(|e| format!("failed to read protected headers (bstr): {e}"))?
        .to_vec();

    let protected_map = decode_map_from_cbor(&protected_bstr)
        .map_err(|e| format!("failed to parse protected headers: {e}"))?;

    // unprotected headers (map)
    if !matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Map) {
        return Err("unprotected headers are not a map".to_string());
    }

    let unprotected_map = decode_map_from_decoder(&mut dec)
        .map_err(|e| format!("failed to parse unprotected headers: {e}"))?;

    // payload (bstr); claims must be embedded
    if !matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Bytes) {
        return Err("payload is not a bstr".to_string());
    }
    let payload_bstr = dec
        .bytes()
        .map_err(|e| format!("failed to read payload (bstr): {e}"))?
        .to_vec();

    let payload_map = decode_map_from_cbor(&payload_bstr).map_err(|e| format!("failed to parse payload: {e}"))?;

    // signature (bstr)
    let signature = dec
        .bytes()
        .map_err(|e| format!("failed to read signature (bstr): {e}"))?
        .to_vec();

    if dec.position() != input.len() {
        return Err("trailing bytes after COSE_Sign1".to_string());
    }

    let to_be_signed = encode_signature1_sig_structure(&protected_bstr, &payload_bstr)
        .map_err(|e| format!("failed to encode Sig_structure: {e}"))?;

    Ok(ParsedCoseSign1 {
        protected_headers: CborMap::from_encoded(protected_bstr, protected_map),
        unprotected_headers: CborMap::inline(unprotected_map),
        payload: CborMap::from_encoded(payload_bstr, payload_map),
        signature,
        to_be_signed,
    })
}

/// Encode `Sig_structure = ["Signature1", protected, external_aad, payload]`.
///
/// `protected` and `payload` are the original bstr contents; external_aad is empty.
pub fn encode_signature1_sig_structure(protected: &[u8], payload: &[u8]) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(32 + protected.len() + payload.len());
    {
        let mut enc = Encoder::new(&mut out);
        enc.array(4).map_err(|e| e.to_string())?;
        enc.str(SIG_STRUCTURE_CONTEXT_SIGNATURE1).map_err(|e| e.to_string())?;
        enc.bytes(protected).map_err(|e| e.to_string())?;
        enc.bytes(&[]).map_err(|e| e.to_string())?; // external_aad
        enc.bytes(payload).map_err(|e| e.to_string())?;
    }
    Ok(out)
}
