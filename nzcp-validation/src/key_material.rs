// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Public key material as published in an issuer key set.
//!
//! Entries are PEM `PUBLIC KEY` blocks, or just their base64 body. The DER
//! inside is a SubjectPublicKeyInfo whose key bit string is an uncompressed
//! SEC1 point: one type byte followed by the X and Y coordinates.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use p256::pkcs8::der::Decode as _;
use p256::pkcs8::{ObjectIdentifier, SubjectPublicKeyInfoRef};

/// id-ecPublicKey (RFC 5480).
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Uncompressed SEC1 point marker.
const SEC1_UNCOMPRESSED: u8 = 0x04;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    x: Vec<u8>,
    y: Vec<u8>,
}

impl PublicKeyMaterial {
    /// Parse a key-set entry (full PEM block or bare base64 body).
    pub fn from_pem_body(text: &str) -> Result<Self, String> {
        let body: String = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.starts_with("-----"))
            .collect();
        if body.is_empty() {
            return Err("empty key entry".to_string());
        }

        let der = STANDARD
            .decode(body.as_bytes())
            .map_err(|e| format!("key entry is not base64: {e}"))?;
        Self::from_spki_der(&der)
    }

    pub fn from_spki_der(der: &[u8]) -> Result<Self, String> {
        let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(|e| format!("bad SubjectPublicKeyInfo: {e}"))?;
        if spki.algorithm.oid != EC_PUBLIC_KEY_OID {
            return Err(format!("not an EC public key: {}", spki.algorithm.oid));
        }

        let raw = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| "public key bit string has unused bits".to_string())?;
        Self::from_sec1_point(raw)
    }

    /// Split `0x04 || X || Y` into its coordinates.
    pub fn from_sec1_point(raw: &[u8]) -> Result<Self, String> {
        let (&marker, coords) = raw
            .split_first()
            .ok_or_else(|| "empty public key".to_string())?;
        if marker != SEC1_UNCOMPRESSED {
            return Err(format!("unsupported point encoding 0x{marker:02x}"));
        }
        if coords.is_empty() || coords.len() % 2 != 0 {
            return Err(format!("coordinate bytes have odd length {}", coords.len()));
        }

        let (x, y) = coords.split_at(coords.len() / 2);
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
        })
    }

    pub fn x(&self) -> &[u8] {
        &self.x
    }

    pub fn y(&self) -> &[u8] {
        &self.y
    }
}
