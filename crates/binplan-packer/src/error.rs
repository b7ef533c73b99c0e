//! Packer error types.

use thiserror::Error;

/// Errors raised by the size filter.
///
/// The allocator itself is total and never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error(
        "no eligible items: {excluded} of {total} objects exceed the {threshold}-byte ceiling"
    )]
    NoEligibleItems {
        total: usize,
        excluded: usize,
        threshold: u64,
    },
}
