//! Dispatcher — fans a bin plan out to workers under a concurrency ceiling.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use binplan_core::DispatchConfig;
use binplan_packer::BinPlan;

use crate::error::{DispatchError, DispatchResult};
use crate::worker::{BinJob, BinWorker, DispatchContext};

/// Final state of one bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum BinStatus {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinOutcome {
    pub index: usize,
    pub objects: usize,
    pub total: u64,
    #[serde(flatten)]
    pub status: BinStatus,
}

/// Per-bin results in plan order.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<BinOutcome>,
    /// Most workers observed running at the same time.
    pub peak_concurrency: usize,
}

impl DispatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == BinStatus::Succeeded)
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &BinOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, BinStatus::Failed(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Runs one worker per bin with at most `max_concurrent_workers` in flight.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> DispatchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn max_concurrent_workers(&self) -> usize {
        self.config.max_concurrent_workers
    }

    /// Dispatch every bin in `plan` and wait for all of them.
    ///
    /// A failing or panicking worker fails only its own bin.
    pub async fn dispatch<W: BinWorker>(
        &self,
        plan: BinPlan,
        context: DispatchContext,
        worker: Arc<W>,
    ) -> DispatchResult<DispatchReport> {
        let limit = self.config.max_concurrent_workers;
        let bins = plan.into_bins();
        let bin_count = bins.len();

        info!(
            bins = bin_count,
            max_concurrent_workers = limit,
            queued = bin_count.saturating_sub(limit),
            "dispatching bins"
        );

        let semaphore = Arc::new(Semaphore::new(limit));
        let context = Arc::new(context);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for (index, bin) in bins.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let context = Arc::clone(&context);
            let worker = Arc::clone(&worker);
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);

            tasks.spawn(async move {
                let objects = bin.len();
                let total = bin.total();
                let outcome = |status| BinOutcome {
                    index,
                    objects,
                    total,
                    status,
                };

                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return outcome(BinStatus::Failed("worker pool closed".into()));
                };

                let running = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(running, Ordering::SeqCst);
                debug!(bin = index, objects, total, running, "worker started");

                // Run on its own task so a panic is contained to this bin.
                let job = BinJob { index, bin, context };
                let handle = tokio::spawn(async move { worker.process(job).await });
                let result = match handle.await {
                    Ok(result) => result,
                    Err(e) if e.is_panic() => Err(anyhow::anyhow!("worker panicked")),
                    Err(e) => Err(anyhow::anyhow!(e)),
                };

                active.fetch_sub(1, Ordering::SeqCst);

                match result {
                    Ok(()) => {
                        debug!(bin = index, "worker finished");
                        outcome(BinStatus::Succeeded)
                    }
                    Err(e) => {
                        error!(bin = index, error = %format!("{e:#}"), "worker failed");
                        outcome(BinStatus::Failed(format!("{e:#}")))
                    }
                }
            });
        }

        let mut slots: Vec<Option<BinOutcome>> = vec![None; bin_count];
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| DispatchError::Join(e.to_string()))?;
            let index = outcome.index;
            slots[index] = Some(outcome);
        }

        let outcomes: Vec<BinOutcome> = slots.into_iter().flatten().collect();
        let report = DispatchReport {
            outcomes,
            peak_concurrency: peak.load(Ordering::SeqCst),
        };

        info!(
            bins = bin_count,
            succeeded = report.succeeded(),
            failed = bin_count - report.succeeded(),
            peak_concurrency = report.peak_concurrency,
            "dispatch complete"
        );
        Ok(report)
    }
}
