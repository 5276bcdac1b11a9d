// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Wire types shared by the NZCP decoder and verifier.
//!
//! Kept free of crypto so that the verifier only depends on the shape of
//! [`SignableContent`], not on how a token was decoded.

pub mod cose_sign1;
pub mod header_map;
pub mod signable;

pub use cose_sign1::{
    encode_signature1_sig_structure, parse_cose_sign1, ParsedCoseSign1, COSE_SIGN1_TAG, HEADER_ALG, HEADER_KID,
    SIG_STRUCTURE_CONTEXT_SIGNATURE1,
};
pub use header_map::{decode_map_from_cbor, CborMap, ClaimKey, ClaimValue, MAX_NESTING_DEPTH};
pub use signable::SignableContent;
