// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// Why a token string could not be turned into an [`crate::Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Prefix, segment layout, base-32 body or CBOR structure is wrong.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The token is in this format, but at a revision this decoder does not know.
    #[error("unsupported token version: {0}")]
    UnsupportedVersion(String),

    /// Neither header carries a key identifier (label 4).
    #[error("no key identifier in protected or unprotected header")]
    MissingKeyIdentifier,
}

impl DecodeError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedToken(msg.into())
    }
}
