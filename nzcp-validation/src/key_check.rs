// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-key signature checks.

use p256::ecdsa::VerifyingKey;
use p256::{EncodedPoint, FieldBytes};
use signature::Verifier as _;

use crate::{CoseAlgorithm, PublicKeyMaterial};

/// Failure of a single candidate key, as `(code, message)`.
pub type KeyCheckError = (String, String);

/// Verify `sig_structure` against `cose_signature` with one candidate key.
pub fn verify_with_key(
    alg: CoseAlgorithm,
    key: &PublicKeyMaterial,
    sig_structure: &[u8],
    cose_signature: &[u8],
) -> Result<(), KeyCheckError> {
    match alg {
        CoseAlgorithm::ES256 => verify_es256(key, sig_structure, cose_signature),
        other => Err((
            "UNSUPPORTED_ALG".to_string(),
            format!("{other} is not supported for P-256 key material"),
        )),
    }
}

/// Verify ES256 (P-256 ECDSA) from raw X/Y coordinates.
fn verify_es256(key: &PublicKeyMaterial, msg: &[u8], sig: &[u8]) -> Result<(), KeyCheckError> {
    if key.x().len() != 32 || key.y().len() != 32 {
        return Err((
            "INVALID_PUBLIC_KEY".to_string(),
            format!(
                "P-256 coordinates must be 32 bytes, got x={} y={}",
                key.x().len(),
                key.y().len()
            ),
        ));
    }

    let point = EncodedPoint::from_affine_coordinates(
        &FieldBytes::clone_from_slice(key.x()),
        &FieldBytes::clone_from_slice(key.y()),
        false,
    );
    let vk = VerifyingKey::from_encoded_point(&point)
        .map_err(|e| ("INVALID_PUBLIC_KEY".to_string(), format!("bad P-256 public key: {e}")))?;

    // COSE carries ECDSA signatures as the raw `r || s` concatenation.
    let signature = p256::ecdsa::Signature::from_slice(sig)
        .map_err(|e| ("BAD_SIGNATURE".to_string(), format!("bad ES256 signature: {e}")))?;
    vk.verify(msg, &signature)
        .map_err(|_| ("BAD_SIGNATURE".to_string(), "signature verification failed".to_string()))
}
