//! Size filter — splits a catalog snapshot into eligible and excluded objects.
//!
//! An object is eligible iff `size <= threshold`, where the threshold comes
//! from the configured [`CeilingPolicy`]. Relative order of eligible objects
//! is preserved. Each excluded object produces exactly one diagnostic record
//! and one warning event; excluded objects are never re-evaluated.

use tracing::{info, warn};

use binplan_core::{CeilingPolicy, EmptyPolicy, ExcludedObject, PackingConfig, StorageObject};

use crate::error::FilterError;

/// Result of running the size filter.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Objects at or below the threshold, in arrival order.
    pub eligible: Vec<StorageObject>,
    /// One record per rejected object, in arrival order.
    pub excluded: Vec<ExcludedObject>,
    /// The effective threshold that was applied.
    pub threshold: u64,
}

/// The size filter, configured with a ceiling and an empty-result policy.
#[derive(Debug, Clone)]
pub struct SizeFilter {
    ceiling: CeilingPolicy,
    empty: EmptyPolicy,
}

impl SizeFilter {
    pub fn new(ceiling: CeilingPolicy, empty: EmptyPolicy) -> Self {
        Self { ceiling, empty }
    }

    pub fn from_config(config: &PackingConfig) -> Self {
        Self::new(config.ceiling_policy(), config.empty_result)
    }

    pub fn threshold(&self) -> u64 {
        self.ceiling.threshold()
    }

    /// Partition `objects` into eligible objects and exclusion diagnostics.
    ///
    /// Fails with [`FilterError::NoEligibleItems`] when nothing survives and
    /// the policy is [`EmptyPolicy::Fail`]. An empty input counts as nothing
    /// surviving.
    pub fn apply(&self, objects: Vec<StorageObject>) -> Result<FilterOutcome, FilterError> {
        let threshold = self.threshold();
        let total = objects.len();
        let mut eligible = Vec::with_capacity(total);
        let mut excluded = Vec::new();

        for object in objects {
            if object.size <= threshold {
                eligible.push(object);
            } else {
                warn!(
                    id = %object.id,
                    size = object.size,
                    threshold,
                    "object exceeds size ceiling, excluded from packing"
                );
                excluded.push(ExcludedObject {
                    id: object.id,
                    size: object.size,
                    threshold,
                });
            }
        }

        if eligible.is_empty() && self.empty == EmptyPolicy::Fail {
            return Err(FilterError::NoEligibleItems {
                total,
                excluded: excluded.len(),
                threshold,
            });
        }

        info!(
            eligible = eligible.len(),
            excluded = excluded.len(),
            threshold,
            "size filter applied"
        );

        Ok(FilterOutcome {
            eligible,
            excluded,
            threshold,
        })
    }
}

/// Strict filter with the failing empty-result policy.
pub fn filter(objects: Vec<StorageObject>, max_size: u64) -> Result<FilterOutcome, FilterError> {
    SizeFilter::new(CeilingPolicy::strict(max_size), EmptyPolicy::Fail).apply(objects)
}
