//! Job error types.

use thiserror::Error;

use binplan_catalog::FetchError;
use binplan_core::ConfigError;
use binplan_packer::FilterError;

pub type JobResult<T> = Result<T, JobError>;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("invalid config, {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input, {0}")]
    Validation(String),

    #[error("failed to fetch objects, {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to build bin plan, {0}")]
    NoEligibleItems(#[from] FilterError),
}
