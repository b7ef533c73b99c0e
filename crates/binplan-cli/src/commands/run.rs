use std::sync::Arc;

use tracing::info;

use binplan_dispatch::{BinStatus, CommandWorker, DispatchReport, Dispatcher, LogWorker};

use crate::JobArgs;
use crate::commands::plan;

pub async fn run(args: &JobArgs, exec: Option<String>, exec_args: Vec<String>) -> anyhow::Result<()> {
    let (config, request, outcome) = plan::build(args).await?;
    let dispatcher = Dispatcher::new(config.dispatch.clone())?;
    let context = request.dispatch_context();

    info!(
        bins = outcome.plan.bin_count(),
        excluded = outcome.excluded.len(),
        "plan ready"
    );

    let report = match exec {
        Some(program) => {
            let worker = Arc::new(CommandWorker::new(program, exec_args));
            dispatcher.dispatch(outcome.plan, context, worker).await?
        }
        None => {
            dispatcher
                .dispatch(outcome.plan, context, Arc::new(LogWorker))
                .await?
        }
    };

    print_report(&report);

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} bins failed", report.outcomes.len());
    }
    Ok(())
}

fn print_report(report: &DispatchReport) {
    println!(
        "✓ {} of {} bins processed (peak concurrency {})",
        report.succeeded(),
        report.outcomes.len(),
        report.peak_concurrency
    );
    for failed in report.failed() {
        if let BinStatus::Failed(error) = &failed.status {
            println!("  ✗ bin {}: {error}", failed.index);
        }
    }
}
