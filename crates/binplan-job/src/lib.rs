//! binplan-job — one packing job from request to response.
//!
//! ```text
//! JobRequest ─validate─► ObjectCatalog ─► SizeFilter ─► FirstFitAllocator ─► JobOutcome
//! ```
//!
//! Any failure aborts the job; no partial plan is ever returned.

pub mod error;
pub mod handler;
pub mod request;

pub use error::{JobError, JobResult};
pub use handler::{JobHandler, JobOutcome};
pub use request::{JobRequest, JobResponse};
