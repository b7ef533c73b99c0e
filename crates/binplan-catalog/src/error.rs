//! Catalog error types.

use thiserror::Error;

pub type FetchResult<T> = Result<T, FetchError>;

/// Errors from enumerating or looking up objects. All are fatal to a job.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("duplicate object id in {bucket}: {id}")]
    DuplicateId { bucket: String, id: String },

    #[error("invalid path component: {0}")]
    InvalidPath(String),

    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
