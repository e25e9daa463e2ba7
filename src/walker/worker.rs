//! Worker thread logic for parallel attribute renaming
//!
//! Each worker:
//! - Pulls jobs from the shared queue until it is closed and drained
//! - Renames the attribute on the file (or inspects it in debug mode)
//! - Records the outcome in its own statistics and the progress stream
//!
//! Workers hold no state besides the shared, immutable configuration.

use crate::config::RenameConfig;
use crate::error::{FileError, FileOutcome, WorkerError};
use crate::ops::{inspect_file, process_file};
use crate::progress::{OutputSink, ProgressReporter};
use crate::store::AttributeStore;
use crate::walker::queue::{Job, JobReceiver};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Files whose attribute was renamed
    pub renamed: AtomicU64,

    /// Empty files left alone
    pub skipped: AtomicU64,

    /// Files that failed
    pub failed: AtomicU64,

    /// Debug-mode files that had the source attribute
    pub inspected: AtomicU64,
}

impl WorkerStats {
    fn record(&self, outcome: &FileOutcome) {
        let counter = match outcome {
            FileOutcome::Renamed { .. } => &self.renamed,
            FileOutcome::Skipped { .. } => &self.skipped,
            FileOutcome::Failed { .. } => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_inspected(&self) {
        self.inspected.fetch_add(1, Ordering::Relaxed);
    }
}

/// Totals across all workers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolTotals {
    pub renamed: u64,
    pub skipped: u64,
    pub failed: u64,
    pub inspected: u64,
}

/// Everything a worker needs to process a job
pub struct WorkerContext {
    /// Run configuration
    pub config: Arc<RenameConfig>,

    /// Attribute store
    pub store: Arc<dyn AttributeStore>,

    /// Progress stream
    pub reporter: Arc<ProgressReporter>,

    /// Sink for debug inspection lines
    pub output: OutputSink,

    /// Stop claiming new jobs once set
    pub shutdown: Arc<AtomicBool>,
}

/// A worker thread that processes jobs
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(id: usize, ctx: Arc<WorkerContext>, queue_rx: JobReceiver) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("rename-{}", id))
            .spawn(move || worker_loop(id, ctx, queue_rx, stats_clone))
            .map_err(|e| WorkerError::InitFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| WorkerError::Panicked {
                id: self.id,
                message: "Worker thread panicked".into(),
            })
        } else {
            Ok(())
        }
    }
}

/// Fixed-size set of workers draining one queue
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Spawn `count` workers sharing `ctx` and `queue_rx`
    pub fn spawn(count: usize, ctx: Arc<WorkerContext>, queue_rx: JobReceiver) -> Result<Self, WorkerError> {
        let mut workers = Vec::with_capacity(count);
        for id in 0..count.max(1) {
            workers.push(Worker::spawn(id, Arc::clone(&ctx), queue_rx.clone())?);
        }

        debug!(count = workers.len(), "Workers spawned");
        Ok(Self { workers })
    }

    /// Number of workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Wait for every worker to exit and sum their statistics
    ///
    /// Returns only after all workers have finished, so every progress
    /// symbol has been written by then.
    pub fn join(self) -> PoolTotals {
        let stats: Vec<Arc<WorkerStats>> = self.workers.iter().map(|w| Arc::clone(&w.stats)).collect();

        for worker in self.workers {
            let id = worker.id();
            if let Err(e) = worker.join() {
                warn!(worker = id, error = %e, "Worker failed to join cleanly");
            }
        }

        aggregate_stats(&stats)
    }
}

/// Main worker loop
fn worker_loop(id: usize, ctx: Arc<WorkerContext>, queue_rx: JobReceiver, stats: Arc<WorkerStats>) {
    debug!(worker = id, "Worker starting");

    while !ctx.shutdown.load(Ordering::Relaxed) {
        let Some(job) = queue_rx.recv() else {
            break;
        };
        process_job(id, &job, &ctx, &stats);
    }

    debug!(
        worker = id,
        renamed = stats.renamed.load(Ordering::Relaxed),
        skipped = stats.skipped.load(Ordering::Relaxed),
        failed = stats.failed.load(Ordering::Relaxed),
        "Worker shutting down"
    );
}

/// Process a single job
fn process_job(worker_id: usize, job: &Job, ctx: &WorkerContext, stats: &WorkerStats) {
    if ctx.config.debug {
        if let Some(line) = inspect_file(ctx.store.as_ref(), &job.path, &ctx.config) {
            stats.record_inspected();
            if let Err(e) = ctx.output.write_line(&line) {
                debug!(worker = worker_id, error = %e, "Failed to write inspection line");
            }
        }
        return;
    }

    let outcome = process_file(ctx.store.as_ref(), &job.path, &ctx.config);
    stats.record(&outcome);

    match &outcome {
        FileOutcome::Renamed { path } => {
            trace!(worker = worker_id, path = %path.display(), "Attribute renamed");
        }
        FileOutcome::Skipped { path, reason } => {
            trace!(worker = worker_id, path = %path.display(), reason = %reason, "File skipped");
        }
        FileOutcome::Failed {
            path,
            error: FileError::Rename(e),
        } if e.leaves_both_attributes() => {
            warn!(
                worker = worker_id,
                path = %path.display(),
                error = %e,
                "Target written but source not removed; file carries both attributes"
            );
        }
        FileOutcome::Failed { path, error } => {
            debug!(worker = worker_id, path = %path.display(), error = %error, "File failed");
        }
    }

    if let Err(e) = ctx.reporter.record(&outcome) {
        debug!(worker = worker_id, error = %e, "Failed to write progress");
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_stats(stats: &[Arc<WorkerStats>]) -> PoolTotals {
    let mut totals = PoolTotals::default();

    for s in stats {
        totals.renamed += s.renamed.load(Ordering::Relaxed);
        totals.skipped += s.skipped.load(Ordering::Relaxed);
        totals.failed += s.failed.load(Ordering::Relaxed);
        totals.inspected += s.inspected.load(Ordering::Relaxed);
    }

    totals
}
