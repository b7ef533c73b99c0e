//! Bin workers.
//!
//! A worker processes exactly one bin. It owns the bin it is given; no two
//! workers ever see the same object.

use std::future::Future;
use std::io;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, bail};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use binplan_core::{OpaqueRules, StorageObject};
use binplan_packer::Bin;

/// Job-level data passed through to every worker untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchContext {
    pub bucket_identifier: String,
    pub access_credential_ref: String,
    pub rules: OpaqueRules,
}

/// One unit of work: a bin plus its position in the plan.
#[derive(Debug)]
pub struct BinJob {
    pub index: usize,
    pub bin: Bin,
    pub context: Arc<DispatchContext>,
}

/// Processes a single bin.
pub trait BinWorker: Send + Sync + 'static {
    fn process(&self, job: BinJob) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Logs each bin and succeeds. Used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct LogWorker;

impl BinWorker for LogWorker {
    async fn process(&self, job: BinJob) -> anyhow::Result<()> {
        info!(
            bin = job.index,
            objects = job.bin.len(),
            total = job.bin.total(),
            bucket = %job.context.bucket_identifier,
            "bin ready"
        );
        Ok(())
    }
}

/// What a [`CommandWorker`] writes to the child's stdin.
#[derive(Debug, Serialize)]
struct BinPayload<'a> {
    index: usize,
    bucket_identifier: &'a str,
    access_credential_ref: &'a str,
    rules: &'a OpaqueRules,
    items: &'a [StorageObject],
    total: u64,
}

/// Runs an external program once per bin.
///
/// The bin is written to the child's stdin as a JSON document; the bin
/// index is also exported as `BINPLAN_BIN_INDEX`. A non-zero exit status
/// fails the bin.
#[derive(Debug, Clone)]
pub struct CommandWorker {
    program: String,
    args: Vec<String>,
}

impl CommandWorker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl BinWorker for CommandWorker {
    async fn process(&self, job: BinJob) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(&BinPayload {
            index: job.index,
            bucket_identifier: &job.context.bucket_identifier,
            access_credential_ref: &job.context.access_credential_ref,
            rules: &job.context.rules,
            items: job.bin.objects(),
            total: job.bin.total(),
        })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("BINPLAN_BIN_INDEX", job.index.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program))?;

        // Feed stdin while the child's output is drained, so a child that
        // echoes as it reads cannot stall on a full stdout pipe.
        let stdin = child.stdin.take();
        // Dropping stdin at the end of `feed` closes the pipe so the child sees EOF.
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok::<(), io::Error>(());
            };
            match stdin.write_all(&payload).await {
                // The child stopped reading; its exit status decides.
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        debug!(
            bin = job.index,
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "worker command finished"
        );

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        fed.with_context(|| format!("failed to write bin {} to {}", job.index, self.program))?;
        Ok(())
    }
}
