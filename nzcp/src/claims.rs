// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Typed lookups over the CWT claims of a pass.

use std::collections::BTreeMap;

use nzcp_common::{CborMap, ClaimKey, ClaimValue};
use uuid::Uuid;

pub const CLAIM_ISSUER: i64 = 1;
pub const CLAIM_EXPIRY: i64 = 4;
pub const CLAIM_NOT_BEFORE: i64 = 5;
pub const CLAIM_TOKEN_ID: i64 = 7;
pub const CLAIM_CREDENTIAL: &str = "vc";

/// Borrowed view over a pass payload.
///
/// Each claim is looked up by its CWT integer key first, then by its JWT name.
#[derive(Debug, Clone, Copy)]
pub struct PassClaims<'a> {
    payload: &'a CborMap,
}

impl<'a> PassClaims<'a> {
    pub fn new(payload: &'a CborMap) -> Self {
        Self { payload }
    }

    fn lookup(&self, label: i64, names: &[&str]) -> Option<&'a ClaimValue> {
        let payload = self.payload;
        payload
            .get_label(label)
            .or_else(|| names.iter().find_map(|name| payload.get_named(name)))
    }

    pub fn issuer(&self) -> Option<&'a str> {
        self.lookup(CLAIM_ISSUER, &["iss"]).and_then(ClaimValue::as_text)
    }

    /// Start of validity, seconds since the epoch.
    pub fn not_before(&self) -> Option<i64> {
        self.lookup(CLAIM_NOT_BEFORE, &["nbf"]).and_then(ClaimValue::as_i64)
    }

    /// End of validity, seconds since the epoch.
    pub fn expiry(&self) -> Option<i64> {
        self.lookup(CLAIM_EXPIRY, &["exp"]).and_then(ClaimValue::as_i64)
    }

    /// Raw CWT token identifier.
    pub fn token_id(&self) -> Option<&'a [u8]> {
        self.lookup(CLAIM_TOKEN_ID, &["cti", "jti"]).and_then(ClaimValue::as_bytes)
    }

    /// Token identifier as a `urn:uuid:` string, when it is 16 bytes long.
    pub fn token_id_uuid(&self) -> Option<String> {
        let id = Uuid::from_slice(self.token_id()?).ok()?;
        Some(id.urn().to_string())
    }

    /// The verifiable credential document (`vc`).
    pub fn credential(&self) -> Option<&'a BTreeMap<ClaimKey, ClaimValue>> {
        self.payload.get_named(CLAIM_CREDENTIAL).and_then(ClaimValue::as_map)
    }

    /// `type` entries of the credential.
    pub fn credential_types(&self) -> Vec<&'a str> {
        self.credential()
            .and_then(|vc| vc.get(&ClaimKey::from("type")))
            .and_then(ClaimValue::as_array)
            .map(|types| types.iter().filter_map(ClaimValue::as_text).collect())
            .unwrap_or_default()
    }

    pub fn credential_subject(&self) -> Option<CredentialSubject<'a>> {
        let subject = self
            .credential()?
            .get(&ClaimKey::from("credentialSubject"))
            .and_then(ClaimValue::as_map)?;
        Some(CredentialSubject { subject })
    }
}

/// The person a pass was issued to.
#[derive(Debug, Clone, Copy)]
pub struct CredentialSubject<'a> {
    subject: &'a BTreeMap<ClaimKey, ClaimValue>,
}

impl<'a> CredentialSubject<'a> {
    fn text(&self, name: &str) -> Option<&'a str> {
        self.subject.get(&ClaimKey::from(name)).and_then(ClaimValue::as_text)
    }

    pub fn given_name(&self) -> Option<&'a str> {
        self.text("givenName")
    }

    pub fn family_name(&self) -> Option<&'a str> {
        self.text("familyName")
    }

    /// Date of birth as carried in the pass (`YYYY-MM-DD`).
    pub fn dob(&self) -> Option<&'a str> {
        self.text("dob")
    }
}
