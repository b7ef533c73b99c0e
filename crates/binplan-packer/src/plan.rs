//! Bin plans — the read-only output of one allocation run.
//!
//! Bins can only be built by the allocator; everything here is a view over
//! totals that were accumulated while packing.

use serde::Serialize;

use binplan_core::StorageObject;

/// A group of objects processed as one unit downstream.
///
/// Never empty. `total` always equals the sum of member sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bin {
    #[serde(rename = "items")]
    objects: Vec<StorageObject>,
    total: u64,
}

impl Bin {
    pub(crate) fn open(object: StorageObject) -> Self {
        Self {
            total: object.size,
            objects: vec![object],
        }
    }

    /// Whether `size` can join without pushing the total past `capacity`.
    pub(crate) fn fits(&self, size: u64, capacity: u64) -> bool {
        self.total
            .checked_add(size)
            .is_some_and(|total| total <= capacity)
    }

    pub(crate) fn insert(&mut self, object: StorageObject) {
        self.total += object.size;
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[StorageObject] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<StorageObject> {
        self.objects
    }

    /// Sum of member sizes in bytes.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Ordered bins produced by a single allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinPlan {
    bins: Vec<Bin>,
    desired_capacity: u64,
}

/// Counts a caller needs for dispatch decisions and job summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub total_bins: usize,
    pub total_items: usize,
    pub total_bytes: u64,
    /// Largest bin total, 0 for an empty plan.
    pub largest_bin: u64,
    /// Single-object bins whose total exceeds the desired capacity.
    pub oversized_bins: usize,
}

impl BinPlan {
    pub(crate) fn new(bins: Vec<Bin>, desired_capacity: u64) -> Self {
        Self {
            bins,
            desired_capacity,
        }
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Hand the bins over, e.g. to a dispatcher.
    pub fn into_bins(self) -> Vec<Bin> {
        self.bins
    }

    pub fn desired_capacity(&self) -> u64 {
        self.desired_capacity
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn object_count(&self) -> usize {
        self.bins.iter().map(Bin::len).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.bins
            .iter()
            .fold(0u64, |acc, bin| acc.saturating_add(bin.total()))
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            total_bins: self.bin_count(),
            total_items: self.object_count(),
            total_bytes: self.total_bytes(),
            largest_bin: self.bins.iter().map(Bin::total).max().unwrap_or(0),
            oversized_bins: self
                .bins
                .iter()
                .filter(|b| b.total() > self.desired_capacity)
                .count(),
        }
    }
}
