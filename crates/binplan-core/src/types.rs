//! Shared types used across binplan crates.

use serde::{Deserialize, Serialize};

/// A storage object as reported by a catalog.
///
/// Identity is `id`, which must be unique within one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageObject {
    pub id: String,
    /// Size in bytes.
    pub size: u64,
}

impl StorageObject {
    pub fn new(id: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            size,
        }
    }
}

/// Diagnostic record for an object rejected by the size filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedObject {
    pub id: String,
    pub size: u64,
    /// Effective ceiling the object was compared against.
    pub threshold: u64,
}

/// Rule lists carried through a job untouched.
///
/// The contents are never interpreted; only the count is exposed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueRules(Vec<Vec<serde_json::Value>>);

impl OpaqueRules {
    pub fn new(rules: Vec<Vec<serde_json::Value>>) -> Self {
        Self(rules)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
