//! binplan-dispatch — runs one worker per bin.
//!
//! The dispatcher takes ownership of a `BinPlan` and hands each bin to a
//! `BinWorker` on its own task. A semaphore caps how many workers run at
//! once; bins beyond the cap wait for a permit. The cap never changes how
//! bins were formed.
//!
//! # Architecture
//!
//! ```text
//! Dispatcher
//!   ├── Semaphore (max_concurrent_workers permits)
//!   └── per-bin task
//!       ├── acquire permit (queued while the pool is full)
//!       └── BinWorker::process(BinJob)
//! ```

pub mod dispatcher;
pub mod error;
pub mod worker;

pub use dispatcher::{BinOutcome, BinStatus, DispatchReport, Dispatcher};
pub use error::{DispatchError, DispatchResult};
pub use worker::{BinJob, BinWorker, CommandWorker, DispatchContext, LogWorker};
