//! Dispatcher error types.

use thiserror::Error;

/// Errors that stop a dispatch as a whole. Individual worker failures are
/// reported per bin instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("config error: {0}")]
    Config(#[from] binplan_core::ConfigError),

    #[error("dispatch task failed: {0}")]
    Join(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
