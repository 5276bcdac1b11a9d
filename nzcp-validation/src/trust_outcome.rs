// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trust outcome types.
//!
//! "Could not check" and "checked and failed" are different answers, so the
//! verifier reports three states instead of a boolean.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustOutcome {
    /// No candidate keys for the key identifier, or the key set was unavailable.
    Unknown,
    /// Candidate keys existed and none of them validated the signature.
    Invalid,
    /// A candidate key validated the signature.
    Valid,
}

impl TrustOutcome {
    pub fn is_valid(self) -> bool {
        matches!(self, TrustOutcome::Valid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrustOutcome::Unknown => "unknown",
            TrustOutcome::Invalid => "invalid",
            TrustOutcome::Valid => "valid",
        }
    }
}

impl fmt::Display for TrustOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome plus which key (if any) matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustReport {
    pub outcome: TrustOutcome,
    /// Key identifier the candidates were looked up by.
    pub key_identifier: String,
    /// Index into the candidate list of the key that validated the signature.
    pub matched_key_index: Option<usize>,
    /// Number of candidates evaluated before stopping.
    pub candidates_tried: usize,
}

impl TrustReport {
    pub(crate) fn unknown(key_identifier: &str) -> Self {
        Self {
            outcome: TrustOutcome::Unknown,
            key_identifier: key_identifier.to_string(),
            matched_key_index: None,
            candidates_tried: 0,
        }
    }
}
