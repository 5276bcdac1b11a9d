// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trust evaluation of a decoded pass against an issuer key set.
//!
//! Flow:
//! 1) Fetch the candidate keys registered under the key identifier.
//! 2) Resolve the envelope's `alg` (and enforce the expected one, if configured).
//! 3) Try each candidate in the order the key set lists them; the first key that
//!    validates the signature wins.
//!
//! A candidate that fails for any reason (unparseable entry, wrong curve, bad
//! signature) is logged and skipped. It never aborts the remaining candidates.

use nzcp_common::SignableContent;
use tracing::{debug, warn};

use crate::key_check::{verify_with_key, KeyCheckError};
use crate::{CoseAlgorithm, KeySetSource, PublicKeyMaterial, TrustOutcome, TrustReport, VerifierSettings};

#[derive(Debug, Clone, Default)]
pub struct TrustVerifier {
    settings: VerifierSettings,
}

impl TrustVerifier {
    pub fn new(settings: VerifierSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &VerifierSettings {
        &self.settings
    }

    /// Evaluate `content` against the keys registered under `kid`.
    pub async fn verify<S>(&self, content: &SignableContent, kid: &[u8], source: &S) -> TrustOutcome
    where
        S: KeySetSource + ?Sized,
    {
        self.verify_detailed(content, kid, source).await.outcome
    }

    /// Like [`Self::verify`], also reporting which candidate matched.
    pub async fn verify_detailed<S>(&self, content: &SignableContent, kid: &[u8], source: &S) -> TrustReport
    where
        S: KeySetSource + ?Sized,
    {
        let kid = key_set_index(kid);

        let candidates = match source.fetch(&kid).await {
            Ok(Some(candidates)) if !candidates.is_empty() => candidates,
            Ok(_) => {
                debug!(kid = %kid, "no candidate keys registered");
                return TrustReport::unknown(&kid);
            }
            Err(e) => {
                warn!(kid = %kid, error = %e, "key set unavailable");
                return TrustReport::unknown(&kid);
            }
        };

        let alg = self.resolve_alg(content);

        for (index, entry) in candidates.iter().enumerate() {
            match check_candidate(&alg, entry, content) {
                Ok(()) => {
                    debug!(kid = %kid, index, "signature validated");
                    return TrustReport {
                        outcome: TrustOutcome::Valid,
                        key_identifier: kid,
                        matched_key_index: Some(index),
                        candidates_tried: index + 1,
                    };
                }
                Err((code, message)) => {
                    debug!(kid = %kid, index, code = %code, message = %message, "candidate key rejected");
                }
            }
        }

        TrustReport {
            outcome: TrustOutcome::Invalid,
            key_identifier: kid,
            matched_key_index: None,
            candidates_tried: candidates.len(),
        }
    }

    fn resolve_alg(&self, content: &SignableContent) -> Result<CoseAlgorithm, KeyCheckError> {
        let label = content
            .algorithm
            .ok_or_else(|| ("MISSING_OR_INVALID_ALG".to_string(), "missing alg header".to_string()))?;
        let alg = CoseAlgorithm::from_label(label)
            .ok_or_else(|| ("MISSING_OR_INVALID_ALG".to_string(), format!("unsupported alg: {label}")))?;

        if let Some(expected) = self.settings.expected_alg {
            if expected != alg {
                return Err((
                    "ALG_MISMATCH".to_string(),
                    format!("alg header mismatch: expected {expected}, got {alg}"),
                ));
            }
        }
        Ok(alg)
    }
}

fn check_candidate(
    alg: &Result<CoseAlgorithm, KeyCheckError>,
    entry: &str,
    content: &SignableContent,
) -> Result<(), KeyCheckError> {
    let alg = alg.clone()?;
    let key = PublicKeyMaterial::from_pem_body(entry).map_err(|e| ("INVALID_PUBLIC_KEY".to_string(), e))?;
    verify_with_key(alg, &key, &content.to_be_signed, &content.signature)
}

/// Key sets are indexed by the text form of the key identifier.
///
/// Each byte maps to the char with the same code point (Latin-1), so distinct
/// identifiers never share an index. ASCII identifiers are unchanged.
pub fn key_set_index(kid: &[u8]) -> String {
    kid.iter().map(|&b| char::from(b)).collect()
}

/// Verify with default settings (ES256 required).
pub async fn verify<S>(content: &SignableContent, kid: &[u8], source: &S) -> TrustOutcome
where
    S: KeySetSource + ?Sized,
{
    TrustVerifier::default().verify(content, kid, source).await
}
