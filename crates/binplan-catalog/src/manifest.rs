//! Manifest-file catalog.
//!
//! The manifest is a JSON object mapping bucket names to ordered object
//! lists:
//!
//! ```json
//! { "corpus": [ { "id": "train/a.conllu", "size": 1048576 } ] }
//! ```
//!
//! The file is read on every call so each invocation sees a fresh snapshot.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use binplan_core::StorageObject;

use crate::error::{FetchError, FetchResult};
use crate::memory::InMemoryCatalog;
use crate::ObjectCatalog;

#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    path: PathBuf,
}

impl ManifestCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> FetchResult<InMemoryCatalog> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let buckets: HashMap<String, Vec<StorageObject>> = serde_json::from_str(&content)
            .map_err(|e| FetchError::Manifest(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), buckets = buckets.len(), "manifest loaded");
        Ok(InMemoryCatalog::from_buckets(buckets))
    }
}

impl ObjectCatalog for ManifestCatalog {
    async fn list_objects(
        &self,
        bucket: &str,
        keys: Option<&[String]>,
    ) -> FetchResult<Vec<StorageObject>> {
        self.load().await?.select(bucket, keys)
    }
}
