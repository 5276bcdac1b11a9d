// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signature trust evaluation for NZ COVID Pass tokens.
//!
//! The entry point is [`TrustVerifier`]: given the [`SignableContent`] of a
//! decoded pass and its key identifier, it evaluates the signature against
//! every candidate key a [`KeySetSource`] holds for that identifier and returns
//! a [`TrustOutcome`].
//!
//! [`SignableContent`]: nzcp_common::SignableContent

mod algorithms;
mod key_check;
mod key_material;
mod key_set;
mod settings;
mod trust_outcome;
mod trust_verifier;

pub use algorithms::CoseAlgorithm;
pub use key_check::{verify_with_key, KeyCheckError};
pub use key_material::PublicKeyMaterial;
pub use key_set::{JsonFileKeySet, KeySetError, KeySetSource, StaticKeySet};
pub use settings::VerifierSettings;
pub use trust_outcome::{TrustOutcome, TrustReport};
pub use trust_verifier::{key_set_index, verify, TrustVerifier};
