// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::format::FormatRegistry;

/// Literal that starts every NZ COVID Pass token.
pub const NZCP_PREFIX: &str = "NZCP:";

/// Separator between prefix, version and body.
pub const SEGMENT_DELIMITER: char = '/';

#[derive(Debug, Clone)]
pub struct DecoderSettings {
    pub(crate) prefix: String,
    pub(crate) registry: FormatRegistry,
}

impl DecoderSettings {
    /// Expect a different prefix literal (compared case-sensitively).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replace the set of supported versions.
    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            prefix: NZCP_PREFIX.to_string(),
            registry: FormatRegistry::standard(),
        }
    }
}
