//! In-memory catalog.

use std::collections::HashMap;

use binplan_core::StorageObject;

use crate::error::{FetchError, FetchResult};
use crate::{ObjectCatalog, ensure_unique};

/// Buckets of objects held in memory, enumerated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    buckets: HashMap<String, Vec<StorageObject>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_buckets(buckets: HashMap<String, Vec<StorageObject>>) -> Self {
        Self { buckets }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>, objects: Vec<StorageObject>) -> Self {
        self.buckets.insert(bucket.into(), objects);
        self
    }

    /// Synchronous listing shared by the in-memory and manifest catalogs.
    pub(crate) fn select(
        &self,
        bucket: &str,
        keys: Option<&[String]>,
    ) -> FetchResult<Vec<StorageObject>> {
        let objects = self
            .buckets
            .get(bucket)
            .ok_or_else(|| FetchError::BucketNotFound(bucket.to_string()))?;
        ensure_unique(bucket, objects)?;

        let Some(keys) = keys else {
            return Ok(objects.clone());
        };

        let index: HashMap<&str, &StorageObject> =
            objects.iter().map(|o| (o.id.as_str(), o)).collect();
        let selected = keys
            .iter()
            .map(|key| {
                index
                    .get(key.as_str())
                    .map(|o| (*o).clone())
                    .ok_or_else(|| FetchError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.clone(),
                    })
            })
            .collect::<FetchResult<Vec<_>>>()?;
        ensure_unique(bucket, &selected)?;
        Ok(selected)
    }
}

impl ObjectCatalog for InMemoryCatalog {
    async fn list_objects(
        &self,
        bucket: &str,
        keys: Option<&[String]>,
    ) -> FetchResult<Vec<StorageObject>> {
        self.select(bucket, keys)
    }
}
