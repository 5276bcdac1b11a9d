// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `nzcp-validation` integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use minicbor::Encoder;
use nzcp_common::{parse_cose_sign1, SignableContent};
use nzcp_validation::{KeySetError, KeySetSource};
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::SigningKey;
use p256::pkcs8::EncodePublicKey as _;

pub const KID: &[u8] = b"key-1";

pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32].into()).expect("sk")
}

/// Bare base64 SPKI body, as stored in issuer key-set files.
pub fn pem_body(sk: &SigningKey) -> String {
    let der = sk.verifying_key().to_public_key_der().expect("der");
    STANDARD.encode(der.as_bytes())
}

pub fn protected_header(alg: Option<i64>) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(if alg.is_some() { 2 } else { 1 }).unwrap();
    enc.i64(4).unwrap();
    enc.bytes(KID).unwrap();
    if let Some(alg) = alg {
        enc.i64(1).unwrap();
        enc.i64(alg).unwrap();
    }
    buf
}

pub fn payload() -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(2).unwrap();
    enc.i64(1).unwrap();
    enc.str("did:web:nzcp.covid19.health.nz").unwrap();
    enc.i64(4).unwrap();
    enc.u64(1_951_416_330).unwrap();
    buf
}

/// Build and sign a COSE_Sign1, then hand back what the decoder would.
pub fn signed_content_with_alg(sk: &SigningKey, alg: Option<i64>) -> SignableContent {
    let protected = protected_header(alg);
    let payload = payload();
    let to_be_signed = {
        let mut out = Vec::new();
        let mut enc = Encoder::new(&mut out);
        enc.array(4).unwrap();
        enc.str("Signature1").unwrap();
        enc.bytes(&protected).unwrap();
        enc.bytes(&[]).unwrap();
        enc.bytes(&payload).unwrap();
        out
    };
    let sig: p256::ecdsa::Signature = sk.sign(&to_be_signed);

    let mut cose = Vec::new();
    let mut enc = Encoder::new(&mut cose);
    enc.tag(minicbor::data::Tag::new(18)).unwrap();
    enc.array(4).unwrap();
    enc.bytes(&protected).unwrap();
    enc.map(0).unwrap();
    enc.bytes(&payload).unwrap();
    enc.bytes(&sig.to_bytes()).unwrap();

    parse_cose_sign1(&cose).expect("parse").signable_content()
}

pub fn signed_content(sk: &SigningKey) -> SignableContent {
    signed_content_with_alg(sk, Some(-7))
}

/// A source whose backing store cannot be reached.
pub struct UnavailableKeySet;

#[async_trait]
impl KeySetSource for UnavailableKeySet {
    async fn fetch(&self, _kid: &str) -> Result<Option<Vec<String>>, KeySetError> {
        Err(KeySetError::Unavailable("connection refused".to_string()))
    }
}
