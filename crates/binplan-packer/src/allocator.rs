//! First-fit bin allocator.
//!
//! Objects are placed in arrival order, with no sorting by size. Each object
//! goes into the earliest-created bin whose running total stays at or below
//! the desired capacity; if none fits, a new bin is opened at the end. A bin
//! opened by an object larger than the capacity is kept as a single-object
//! bin. The same input order always yields the same plan.
//!
//! ```text
//! for object in eligible:
//!     i = first bin where total + size <= capacity
//!     if found: bins[i].insert(object)
//!     else:     bins.push(Bin::open(object))
//! ```

use tracing::{debug, info};

use binplan_core::{PackingConfig, StorageObject};

use crate::plan::{Bin, BinPlan};

/// Streaming first-fit allocator.
///
/// Objects can be pushed as they arrive; the allocator never needs the full
/// input up front.
#[derive(Debug, Clone)]
pub struct FirstFitAllocator {
    capacity: u64,
    bins: Vec<Bin>,
}

impl FirstFitAllocator {
    pub fn new(desired_capacity: u64) -> Self {
        Self {
            capacity: desired_capacity,
            bins: Vec::new(),
        }
    }

    pub fn from_config(config: &PackingConfig) -> Self {
        Self::new(config.desired_capacity.bytes())
    }

    /// Place one object and return the index of the bin it landed in.
    pub fn push(&mut self, object: StorageObject) -> usize {
        let slot = self
            .bins
            .iter()
            .position(|bin| bin.fits(object.size, self.capacity));

        match slot {
            Some(index) => {
                debug!(id = %object.id, size = object.size, bin = index, "placed object");
                self.bins[index].insert(object);
                index
            }
            None => {
                let index = self.bins.len();
                debug!(
                    id = %object.id,
                    size = object.size,
                    bin = index,
                    oversized = object.size > self.capacity,
                    "opened bin"
                );
                self.bins.push(Bin::open(object));
                index
            }
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn finish(self) -> BinPlan {
        info!(
            bins = self.bins.len(),
            capacity = self.capacity,
            "bin plan assembled"
        );
        BinPlan::new(self.bins, self.capacity)
    }
}

/// Pack eligible objects into bins of at most `desired_capacity` bytes.
pub fn pack(eligible: Vec<StorageObject>, desired_capacity: u64) -> BinPlan {
    let mut allocator = FirstFitAllocator::new(desired_capacity);
    for object in eligible {
        allocator.push(object);
    }
    allocator.finish()
}
