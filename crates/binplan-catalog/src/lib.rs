//! binplan-catalog — where packing input comes from.
//!
//! A catalog enumerates the objects in a bucket (or looks up an explicit
//! key list) and reports each object's id and size. Catalogs must return a
//! stable order for the same bucket within one invocation: the allocator's
//! determinism depends on it.
//!
//! # Implementations
//!
//! - **`InMemoryCatalog`** — buckets held in memory
//! - **`ManifestCatalog`** — a JSON manifest file, re-read per call
//! - **`DirectoryCatalog`** — local directories, one per bucket

pub mod directory;
pub mod error;
pub mod manifest;
pub mod memory;

use std::future::Future;

use binplan_core::StorageObject;

pub use directory::DirectoryCatalog;
pub use error::{FetchError, FetchResult};
pub use manifest::ManifestCatalog;
pub use memory::InMemoryCatalog;

/// Source of storage objects for a job.
pub trait ObjectCatalog: Send + Sync {
    /// List objects in `bucket`.
    ///
    /// With `keys = None` the whole bucket is enumerated. With explicit keys
    /// the objects come back in request order, and any missing key fails the
    /// whole call.
    fn list_objects(
        &self,
        bucket: &str,
        keys: Option<&[String]>,
    ) -> impl Future<Output = FetchResult<Vec<StorageObject>>> + Send;
}

/// Reject a listing that repeats an id.
pub(crate) fn ensure_unique(bucket: &str, objects: &[StorageObject]) -> FetchResult<()> {
    let mut seen = std::collections::HashSet::with_capacity(objects.len());
    for object in objects {
        if !seen.insert(object.id.as_str()) {
            return Err(FetchError::DuplicateId {
                bucket: bucket.to_string(),
                id: object.id.clone(),
            });
        }
    }
    Ok(())
}
