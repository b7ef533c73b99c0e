//! Local directory catalog.
//!
//! Each sub-directory of the root is a bucket; every regular file below it
//! is an object whose id is its `/`-joined path relative to the bucket.
//! Enumeration is sorted by file name at every level, so repeated listings
//! of an unchanged tree come back in the same order.

use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use binplan_core::StorageObject;

use crate::error::{FetchError, FetchResult};
use crate::{ObjectCatalog, ensure_unique};

#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn bucket_dir(&self, bucket: &str) -> FetchResult<PathBuf> {
        let relative = safe_relative(bucket)?;
        if relative.components().count() != 1 {
            return Err(FetchError::InvalidPath(bucket.to_string()));
        }
        let dir = self.root.join(relative);
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(FetchError::BucketNotFound(bucket.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::BucketNotFound(bucket.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn lookup(&self, bucket: &str, dir: &Path, key: &str) -> FetchResult<StorageObject> {
        let path = dir.join(safe_relative(key)?);
        let not_found = || FetchError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(StorageObject::new(key, meta.len())),
            Ok(_) => Err(not_found()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }
}

impl ObjectCatalog for DirectoryCatalog {
    async fn list_objects(
        &self,
        bucket: &str,
        keys: Option<&[String]>,
    ) -> FetchResult<Vec<StorageObject>> {
        let dir = self.bucket_dir(bucket).await?;

        let objects = match keys {
            Some(keys) => {
                let mut objects = Vec::with_capacity(keys.len());
                for key in keys {
                    objects.push(self.lookup(bucket, &dir, key).await?);
                }
                objects
            }
            None => {
                let walk_dir = dir.clone();
                tokio::task::spawn_blocking(move || walk(&walk_dir))
                    .await
                    .map_err(std::io::Error::other)??
            }
        };

        ensure_unique(bucket, &objects)?;
        debug!(bucket, dir = %dir.display(), objects = objects.len(), "directory listed");
        Ok(objects)
    }
}

fn walk(dir: &Path) -> FetchResult<Vec<StorageObject>> {
    let mut objects = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| FetchError::InvalidPath(entry.path().display().to_string()))?;
        let id = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let size = entry.metadata().map_err(std::io::Error::from)?.len();
        objects.push(StorageObject::new(id, size));
    }
    Ok(objects)
}

/// Accept only plain relative paths: no root, no `..`, no `.`.
fn safe_relative(raw: &str) -> FetchResult<&Path> {
    let path = Path::new(raw);
    let plain = !raw.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(path)
    } else {
        Err(FetchError::InvalidPath(raw.to_string()))
    }
}
