// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE_Sign1 parsing as used by pass tokens: tagged/untagged envelopes,
//! nested protected-header and payload documents, kid lookup.

use nzcp_common::{parse_cose_sign1, ClaimKey, ClaimValue};
use minicbor::Encoder;

fn protected_es256(kid: Option<&[u8]>) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(if kid.is_some() { 2 } else { 1 }).unwrap();
    if let Some(kid) = kid {
        enc.i64(4).unwrap();
        enc.bytes(kid).unwrap();
    }
    enc.i64(1).unwrap(); // alg
    enc.i64(-7).unwrap(); // ES256
    buf
}

fn payload_claims() -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(4).unwrap();
    enc.i64(1).unwrap();
    enc.str("did:web:nzcp.covid19.health.nz").unwrap();
    enc.i64(4).unwrap();
    enc.u64(1_951_416_330).unwrap();
    enc.i64(7).unwrap();
    enc.bytes(&[0x60, 0xa4, 0xf5, 0x4d, 0x4e, 0x30, 0x43, 0x32, 0xbe, 0x33, 0xad, 0x78, 0xb1, 0xea, 0xfa, 0x4b])
        .unwrap();
    enc.str("vc").unwrap();
    enc.map(1).unwrap();
    enc.str("credentialSubject").unwrap();
    enc.map(1).unwrap();
    enc.str("givenName").unwrap();
    enc.str("Jack").unwrap();
    buf
}

fn make_sign1(tagged: bool, protected: &[u8], unprotected_kid: Option<&[u8]>) -> Vec<u8> {
    let payload = payload_claims();
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    if tagged {
        enc.tag(minicbor::data::Tag::new(18)).unwrap();
    }
    enc.array(4).unwrap();
    enc.bytes(protected).unwrap();
    match unprotected_kid {
        Some(kid) => {
            enc.map(1).unwrap();
            enc.i64(4).unwrap();
            enc.bytes(kid).unwrap();
        }
        None => {
            enc.map(0).unwrap();
        }
    }
    enc.bytes(&payload).unwrap();
    enc.bytes(&[7u8; 64]).unwrap();
    out
}

#[test]
fn parse_accepts_tagged_and_untagged() {
    for tagged in [false, true] {
        let cose = make_sign1(tagged, &protected_es256(Some(b"key-1")), None);
        let parsed = parse_cose_sign1(&cose).expect("parse");
        assert_eq!(parsed.signature, vec![7u8; 64]);
        assert_eq!(parsed.protected_headers.get_i64(1), Some(-7));
        assert_eq!(parsed.key_identifier(), Some(b"key-1".as_slice()));
    }
}

#[test]
fn payload_is_decoded_as_nested_document() {
    let cose = make_sign1(true, &protected_es256(Some(b"key-1")), None);
    let parsed = parse_cose_sign1(&cose).expect("parse");

    assert_eq!(parsed.payload.encoded(), payload_claims().as_slice());
    assert_eq!(
        parsed.payload.get_label(1).and_then(ClaimValue::as_text),
        Some("did:web:nzcp.covid19.health.nz")
    );
    assert_eq!(parsed.payload.get_i64(4), Some(1_951_416_330));
    assert_eq!(parsed.payload.get_bytes(7).map(<[u8]>::len), Some(16));

    let vc = parsed.payload.get_named("vc").and_then(ClaimValue::as_map).expect("vc map");
    let subject = vc
        .get(&ClaimKey::from("credentialSubject"))
        .and_then(ClaimValue::as_map)
        .expect("subject");
    assert_eq!(
        subject.get(&ClaimKey::from("givenName")),
        Some(&ClaimValue::Text("Jack".to_string()))
    );
}

#[test]
fn kid_falls_back_to_unprotected_header() {
    let cose = make_sign1(false, &protected_es256(None), Some(b"key-2"));
    let parsed = parse_cose_sign1(&cose).expect("parse");
    assert!(parsed.protected_headers.get_bytes(4).is_none());
    assert_eq!(parsed.key_identifier(), Some(b"key-2".as_slice()));
}

#[test]
fn protected_kid_wins_over_unprotected() {
    let cose = make_sign1(false, &protected_es256(Some(b"key-1")), Some(b"key-2"));
    let parsed = parse_cose_sign1(&cose).expect("parse");
    assert_eq!(parsed.key_identifier(), Some(b"key-1".as_slice()));
}

#[test]
fn missing_kid_is_reported_as_none() {
    let cose = make_sign1(false, &protected_es256(None), None);
    let parsed = parse_cose_sign1(&cose).expect("parse");
    assert!(parsed.key_identifier().is_none());
}

#[test]
fn algorithm_is_exposed_raw() {
    let cose = make_sign1(false, &protected_es256(Some(b"k")), None);
    let parsed = parse_cose_sign1(&cose).expect("parse");
    assert_eq!(parsed.algorithm(), Some(&ClaimValue::Int(-7)));
    assert_eq!(parsed.signable_content().algorithm, Some(-7));
}

#[test]
fn tagged_timestamps_are_preserved() {
    let payload = {
        let mut buf = Vec::new();
        let mut enc = Encoder::new(&mut buf);
        enc.map(1).unwrap();
        enc.i64(5).unwrap();
        enc.tag(minicbor::data::Tag::new(1)).unwrap();
        enc.u64(1_635_883_530).unwrap();
        buf
    };

    let mut cose = Vec::new();
    let mut enc = Encoder::new(&mut cose);
    enc.array(4).unwrap();
    enc.bytes(&protected_es256(Some(b"k"))).unwrap();
    enc.map(0).unwrap();
    enc.bytes(&payload).unwrap();
    enc.bytes(b"sig").unwrap();

    let parsed = parse_cose_sign1(&cose).expect("parse");
    assert!(matches!(parsed.payload.get_label(5), Some(ClaimValue::Tagged(1, _))));
    assert_eq!(parsed.payload.get_i64(5), Some(1_635_883_530));
}

fn sign1_with_payload(payload: &[u8]) -> Vec<u8> {
    let mut cose = Vec::new();
    let mut enc = Encoder::new(&mut cose);
    enc.array(4).unwrap();
    enc.bytes(&protected_es256(Some(b"k"))).unwrap();
    enc.map(0).unwrap();
    enc.bytes(payload).unwrap();
    enc.bytes(b"sig").unwrap();
    cose
}

#[test]
fn floats_of_every_width_are_accepted() {
    let payload = [
        0xa3, // map(3)
        0x61, b'h', 0xf9, 0x3e, 0x00, // "h": f16 1.5
        0x61, b's', 0xfa, 0x3f, 0xc0, 0x00, 0x00, // "s": f32 1.5
        0x61, b'd', 0xfb, 0x3f, 0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // "d": f64 1.5
    ];

    let parsed = parse_cose_sign1(&sign1_with_payload(&payload)).expect("parse");
    for name in ["h", "s", "d"] {
        assert_eq!(parsed.payload.get_named(name), Some(&ClaimValue::Float(1.5)), "{name}");
    }
    assert_eq!(parsed.payload.encoded(), payload.as_slice());
}

#[test]
fn indefinite_strings_are_concatenated() {
    let payload = [
        0xa2, // map(2)
        0x7f, 0x61, b't', 0xff, // key: indefinite "t"
        0x7f, 0x62, b'a', b'b', 0x61, b'c', 0xff, // indefinite "ab" "c"
        0x61, b'b', // "b"
        0x5f, 0x42, 0x01, 0x02, 0x41, 0x03, 0xff, // indefinite h'0102' h'03'
    ];

    let parsed = parse_cose_sign1(&sign1_with_payload(&payload)).expect("parse");
    assert_eq!(parsed.payload.get_named("t").and_then(ClaimValue::as_text), Some("abc"));
    assert_eq!(
        parsed.payload.get_named("b").and_then(ClaimValue::as_bytes),
        Some([1u8, 2, 3].as_slice())
    );
}

#[test]
fn undefined_is_kept_apart_from_null() {
    let payload = [0xa2, 0x61, b'u', 0xf7, 0x61, b'n', 0xf6];

    let parsed = parse_cose_sign1(&sign1_with_payload(&payload)).expect("parse");
    assert_eq!(parsed.payload.get_named("u"), Some(&ClaimValue::Undefined));
    assert_eq!(parsed.payload.get_named("n"), Some(&ClaimValue::Null));
}

#[test]
fn indefinite_map_is_still_rejected() {
    let payload = [0xbf, 0x61, b'a', 0x01, 0xff];
    let err = parse_cose_sign1(&sign1_with_payload(&payload)).unwrap_err();
    assert!(err.contains("indefinite-length maps"), "{err}");
}
