// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// COSE algorithms (IANA COSE Algorithms registry) that may appear in a pass header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i64)]
pub enum CoseAlgorithm {
    /// ECDSA w/ SHA-256 over P-256.
    ES256 = -7,
    /// ECDSA w/ SHA-384 over P-384.
    ES384 = -35,
    /// ECDSA w/ SHA-512 over P-521.
    ES512 = -36,
}

impl CoseAlgorithm {
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            -7 => Some(Self::ES256),
            -35 => Some(Self::ES384),
            -36 => Some(Self::ES512),
            _ => None,
        }
    }

    pub fn label(self) -> i64 {
        self as i64
    }
}

impl std::fmt::Display for CoseAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CoseAlgorithm::ES256 => "ES256",
            CoseAlgorithm::ES384 => "ES384",
            CoseAlgorithm::ES512 => "ES512",
        };
        f.write_str(name)
    }
}
