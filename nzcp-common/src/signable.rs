// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Everything a verifier needs from a decoded pass, and nothing else.
///
/// `to_be_signed` is the COSE Sig_structure built from the original protected
/// header and payload bytes. It must match what the issuer signed byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableContent {
    pub to_be_signed: Vec<u8>,
    /// Raw `r || s` signature from the envelope.
    pub signature: Vec<u8>,
    /// COSE `alg` label value from the protected header, if it is an integer.
    pub algorithm: Option<i64>,
}
