// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::CoseAlgorithm;

#[derive(Debug, Clone)]
pub struct VerifierSettings {
    /// If set, every candidate fails unless the envelope's `alg` equals this value.
    pub(crate) expected_alg: Option<CoseAlgorithm>,
}

impl VerifierSettings {
    /// Require a specific algorithm.
    pub fn with_expected_alg(mut self, alg: CoseAlgorithm) -> Self {
        self.expected_alg = Some(alg);
        self
    }

    /// Accept whatever supported algorithm the envelope names.
    pub fn without_expected_alg(mut self) -> Self {
        self.expected_alg = None;
        self
    }

    pub fn expected_alg(&self) -> Option<CoseAlgorithm> {
        self.expected_alg
    }
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            expected_alg: Some(CoseAlgorithm::ES256),
        }
    }
}
