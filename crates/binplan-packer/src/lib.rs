//! binplan bin-allocation engine.
//!
//! Turns a catalog snapshot into a plan of capacity-bounded bins that a
//! worker pool can process independently. Two pure steps:
//!
//! ```text
//! objects ──► SizeFilter ──► eligible ──► FirstFitAllocator ──► BinPlan
//!                  │
//!                  └──► ExcludedObject diagnostics
//! ```
//!
//! # Components
//!
//! - **`filter`** — Drops objects above the absolute ceiling
//! - **`allocator`** — Deterministic first-fit in arrival order
//! - **`plan`** — Read-only bins, totals and summary counts
//! - **`report`** — Human-readable plan rendering

pub mod allocator;
pub mod error;
pub mod filter;
pub mod plan;
pub mod report;

pub use allocator::{FirstFitAllocator, pack};
pub use error::FilterError;
pub use filter::{FilterOutcome, SizeFilter, filter};
pub use plan::{Bin, BinPlan, PlanSummary};
