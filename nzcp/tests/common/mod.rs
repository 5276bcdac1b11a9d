// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Pass fixtures for `nzcp` integration tests.
//!
//! Passes are built and signed here with deterministic keys, so every test
//! knows the exact bytes that went into a token.

#![allow(dead_code)]

use data_encoding::BASE32_NOPAD;
use minicbor::data::Tag;
use minicbor::Encoder;
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::{EncodePublicKey as _, LineEnding};

pub const KID: &[u8] = b"key-1";
pub const ISSUER: &str = "did:web:nzcp.covid19.health.nz";
pub const NOT_BEFORE: u64 = 1_635_883_530;
pub const EXPIRY: u64 = 1_951_416_330;
pub const TOKEN_ID: [u8; 16] = [
    0x60, 0xa4, 0xf5, 0x4d, 0x4e, 0x30, 0x43, 0x32, 0xbe, 0x33, 0xad, 0x78, 0xb1, 0xea, 0xfa, 0x4b,
];
pub const ES256: i64 = -7;

pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32].into()).expect("sk")
}

pub fn public_key_pem(sk: &SigningKey) -> String {
    sk.verifying_key().to_public_key_pem(LineEnding::LF).expect("pem")
}

pub fn protected_header(kid: Option<&[u8]>, alg: Option<i64>) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(kid.is_some() as u64 + alg.is_some() as u64).unwrap();
    if let Some(alg) = alg {
        enc.i64(1).unwrap().i64(alg).unwrap();
    }
    if let Some(kid) = kid {
        enc.i64(4).unwrap().bytes(kid).unwrap();
    }
    buf
}

/// CWT claims of a typical public pass.
pub fn payload() -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(5).unwrap();
    enc.i64(1).unwrap().str(ISSUER).unwrap();
    enc.i64(5).unwrap().u64(NOT_BEFORE).unwrap();
    enc.i64(4).unwrap().u64(EXPIRY).unwrap();
    enc.i64(7).unwrap().bytes(&TOKEN_ID).unwrap();
    enc.str("vc").unwrap().map(4).unwrap();
    enc.str("@context").unwrap().array(2).unwrap();
    enc.str("https://www.w3.org/2018/credentials/v1").unwrap();
    enc.str("https://nzcp.covid19.health.nz/contexts/v1").unwrap();
    enc.str("version").unwrap().str("1.0.0").unwrap();
    enc.str("type").unwrap().array(2).unwrap();
    enc.str("VerifiableCredential").unwrap().str("PublicCovidPass").unwrap();
    enc.str("credentialSubject").unwrap().map(3).unwrap();
    enc.str("givenName").unwrap().str("Jack").unwrap();
    enc.str("familyName").unwrap().str("Sparrow").unwrap();
    enc.str("dob").unwrap().str("1960-04-16").unwrap();
    buf
}

/// Sig_structure as an independent encoder would produce it.
pub fn sig_structure(protected: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.array(4).unwrap();
    enc.str("Signature1").unwrap();
    enc.bytes(protected).unwrap();
    enc.bytes(&[]).unwrap();
    enc.bytes(payload).unwrap();
    buf
}

pub fn sign(sk: &SigningKey, protected: &[u8], payload: &[u8]) -> Vec<u8> {
    let sig: Signature = sk.sign(&sig_structure(protected, payload));
    sig.to_bytes().to_vec()
}

pub fn cose_sign1(protected: &[u8], unprotected_kid: Option<&[u8]>, payload: &[u8], signature: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.tag(Tag::new(18)).unwrap();
    enc.array(4).unwrap();
    enc.bytes(protected).unwrap();
    match unprotected_kid {
        Some(kid) => {
            enc.map(1).unwrap().i64(4).unwrap().bytes(kid).unwrap();
        }
        None => {
            enc.map(0).unwrap();
        }
    }
    enc.bytes(payload).unwrap();
    enc.bytes(signature).unwrap();
    buf
}

pub fn token_with(prefix: &str, version: &str, cose: &[u8]) -> String {
    format!("{prefix}/{version}/{}", BASE32_NOPAD.encode(cose))
}

pub fn token(cose: &[u8]) -> String {
    token_with("NZCP:", "1", cose)
}

/// A signed pass and the pieces it was built from.
pub struct Fixture {
    pub token: String,
    pub cose: Vec<u8>,
    pub protected: Vec<u8>,
    pub payload: Vec<u8>,
    pub signature: Vec<u8>,
}

pub fn fixture_with_protected(sk: &SigningKey, protected: Vec<u8>) -> Fixture {
    build_fixture(sk, protected, payload())
}

/// Pass with kid `key-1`, ES256 and the given payload bytes.
pub fn fixture_with_payload(sk: &SigningKey, payload: Vec<u8>) -> Fixture {
    build_fixture(sk, protected_header(Some(KID), Some(ES256)), payload)
}

fn build_fixture(sk: &SigningKey, protected: Vec<u8>, payload: Vec<u8>) -> Fixture {
    let signature = sign(sk, &protected, &payload);
    let cose = cose_sign1(&protected, None, &payload, &signature);
    Fixture {
        token: token(&cose),
        cose,
        protected,
        payload,
        signature,
    }
}

/// Pass with kid `key-1` and ES256 in the protected header.
pub fn fixture(sk: &SigningKey) -> Fixture {
    fixture_with_protected(sk, protected_header(Some(KID), Some(ES256)))
}
