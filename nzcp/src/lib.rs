// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Decode and verify NZ COVID Pass (NZCP) tokens.
//!
//! A token looks like `NZCP:/1/<base-32 body>`. [`decode`] turns it into an
//! [`Envelope`] exposing the COSE_Sign1 headers, the claims and the exact
//! bytes the issuer signed. [`verify_token`] additionally evaluates the
//! signature against a [`KeySetSource`].
//!
//! ```no_run
//! # async fn run(token: &str) -> Result<(), nzcp::DecodeError> {
//! let keys = nzcp::StaticKeySet::from_json(r#"{"key-1": ["MFkw..."]}"#).unwrap_or_default();
//! let (envelope, outcome) = nzcp::verify_token(token, &keys).await?;
//! println!("{} {:?}", outcome, envelope.pass_claims().issuer());
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod envelope;
pub mod error;
pub mod format;
pub mod settings;

pub use claims::{CredentialSubject, PassClaims};
pub use envelope::Envelope;
pub use error::DecodeError;
pub use format::{restore_padding, DecodedBody, FormatRegistry, TokenFormat, V1Format};
pub use settings::{DecoderSettings, NZCP_PREFIX};

pub use nzcp_common::{CborMap, ClaimKey, ClaimValue, SignableContent};
pub use nzcp_validation::{
    JsonFileKeySet, KeySetError, KeySetSource, StaticKeySet, TrustOutcome, TrustReport, TrustVerifier,
    VerifierSettings,
};

/// Decode `token` with default settings.
pub fn decode(token: &str) -> Result<Envelope, DecodeError> {
    Envelope::decode(token)
}

/// Decode `token` and evaluate its signature against `source`.
///
/// Decode failures are returned as errors; trust failures are reported
/// through the [`TrustOutcome`].
pub async fn verify_token<S>(token: &str, source: &S) -> Result<(Envelope, TrustOutcome), DecodeError>
where
    S: KeySetSource + ?Sized,
{
    verify_token_with(token, &DecoderSettings::default(), &TrustVerifier::default(), source).await
}

pub async fn verify_token_with<S>(
    token: &str,
    settings: &DecoderSettings,
    verifier: &TrustVerifier,
    source: &S,
) -> Result<(Envelope, TrustOutcome), DecodeError>
where
    S: KeySetSource + ?Sized,
{
    let envelope = Envelope::decode_with(token, settings)?;
    let kid = envelope.key_identifier()?;
    let outcome = verifier.verify(&envelope.signable_content(), kid, source).await;
    Ok((envelope, outcome))
}
