// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Issuer key sets.
//!
//! A key set maps a key identifier to an ordered list of PEM public-key
//! entries. The verifier only ever asks a [`KeySetSource`] for the entries of
//! one identifier; where the set lives (embedded, file, network) is up to the
//! source.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KeySetError {
    #[error("key set unavailable: {0}")]
    Unavailable(String),

    #[error("key set is not valid JSON: {0}")]
    Parse(String),
}

/// Something that can look up the candidate keys for a key identifier.
///
/// Contract:
/// - `Ok(Some(keys))`: the identifier is known; `keys` keeps the issuer's order.
/// - `Ok(None)`: the set was read but has no entry for the identifier.
/// - `Err(...)`: the set itself could not be obtained.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch(&self, kid: &str) -> Result<Option<Vec<String>>, KeySetError>;
}

/// Key set held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticKeySet {
    keys: BTreeMap<String, Vec<String>>,
}

impl StaticKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "<kid>": ["<pem body>", ...], ... }`.
    pub fn from_json(json: &str) -> Result<Self, KeySetError> {
        let keys: BTreeMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|e| KeySetError::Parse(e.to_string()))?;
        Ok(Self { keys })
    }

    /// Append a key entry under `kid`, after any existing ones.
    pub fn insert(&mut self, kid: impl Into<String>, pem: impl Into<String>) {
        self.keys.entry(kid.into()).or_default().push(pem.into());
    }

    pub fn with_key(mut self, kid: impl Into<String>, pem: impl Into<String>) -> Self {
        self.insert(kid, pem);
        self
    }

    pub fn get(&self, kid: &str) -> Option<&[String]> {
        self.keys.get(kid).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl KeySetSource for StaticKeySet {
    async fn fetch(&self, kid: &str) -> Result<Option<Vec<String>>, KeySetError> {
        Ok(self.keys.get(kid).cloned())
    }
}

/// Key set stored as a JSON file, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileKeySet {
    path: PathBuf,
}

impl JsonFileKeySet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub async fn load(&self) -> Result<StaticKeySet, KeySetError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| KeySetError::Unavailable(format!("{}: {e}", self.path.display())))?;
        let set = StaticKeySet::from_json(&text)?;
        debug!(path = %self.path.display(), identifiers = set.len(), "loaded key set");
        Ok(set)
    }
}

#[async_trait]
impl KeySetSource for JsonFileKeySet {
    async fn fetch(&self, kid: &str) -> Result<Option<Vec<String>>, KeySetError> {
        let set = self.load().await?;
        Ok(set.get(kid).map(<[String]>::to_vec))
    }
}
