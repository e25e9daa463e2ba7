//! Rename coordinator - orchestrates the parallel rename
//!
//! The coordinator is responsible for:
//! - Setting up the job queue and worker pool
//! - Running the traverser on the calling thread
//! - Waiting on the worker barrier and closing the progress stream
//! - Shutdown handling and final statistics

use crate::config::RenameConfig;
use crate::error::Result;
use crate::progress::{OutputSink, ProgressReporter};
use crate::store::AttributeStore;
use crate::walker::queue::JobQueue;
use crate::walker::traverser::Traverser;
use crate::walker::worker::{WorkerContext, WorkerPool};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files discovered and queued
    pub jobs: u64,

    /// Files whose attribute was renamed
    pub renamed: u64,

    /// Empty files left alone
    pub skipped: u64,

    /// Files that failed
    pub failed: u64,

    /// Debug mode: files that carried the source attribute
    pub inspected: u64,

    /// Roots that could not be stat'd
    pub roots_skipped: u64,

    /// Directory roots ignored because recursion is off
    pub dirs_skipped: u64,

    /// Directory walks aborted by an error
    pub walk_errors: u64,

    /// Paths dropped by an exclude pattern
    pub excluded: u64,

    /// Time taken
    pub duration: Duration,

    /// Whether the run completed (vs was interrupted)
    pub completed: bool,
}

/// Coordinates the traverser, queue, workers and progress stream
pub struct RenameCoordinator {
    /// Configuration
    config: Arc<RenameConfig>,

    /// Attribute store shared by every worker
    store: Arc<dyn AttributeStore>,

    /// Progress and debug output
    output: OutputSink,

    /// Shutdown signal
    shutdown: Arc<AtomicBool>,
}

impl RenameCoordinator {
    /// Create a coordinator writing to standard output
    pub fn new(config: RenameConfig, store: Arc<dyn AttributeStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            output: OutputSink::stdout(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send progress and debug output somewhere other than stdout
    pub fn with_output(mut self, output: OutputSink) -> Self {
        self.output = output;
        self
    }

    /// Get a clone of the shutdown flag (for signal handlers)
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the rename over every configured root
    pub fn run(self) -> Result<RunSummary> {
        let start = Instant::now();

        let queue = JobQueue::new(self.config.queue_size);
        let queue_capacity = queue.capacity();
        let queue_stats = queue.stats();
        let (sender, receiver) = queue.split();

        let reporter = Arc::new(ProgressReporter::new(&self.config, self.output.clone()));
        let ctx = Arc::new(WorkerContext {
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
            reporter: Arc::clone(&reporter),
            output: self.output.clone(),
            shutdown: Arc::clone(&self.shutdown),
        });

        let pool = WorkerPool::spawn(self.config.worker_count, ctx, receiver)?;

        info!(
            source = %self.config.source_xattr,
            target = %self.config.target_xattr,
            roots = self.config.paths.len(),
            workers = pool.size(),
            queue_size = queue_capacity,
            debug = self.config.debug,
            "Starting attribute rename"
        );

        // Sender is moved in and dropped on return, closing the queue
        let traversal = Traverser::new(Arc::clone(&self.config), Arc::clone(&self.shutdown)).run(sender);

        let totals = pool.join();
        reporter.finish()?;

        let traversal = traversal?;
        let duration = start.elapsed();
        let completed = traversal.completed && !self.shutdown.load(Ordering::Relaxed);

        debug!(
            enqueued = queue_stats.enqueued.load(Ordering::Relaxed),
            dequeued = queue_stats.throughput(),
            backpressure = queue_stats.backpressure_count(),
            "Queue statistics"
        );

        Ok(RunSummary {
            jobs: traversal.jobs,
            renamed: totals.renamed,
            skipped: totals.skipped,
            failed: totals.failed,
            inspected: totals.inspected,
            roots_skipped: traversal.roots_skipped,
            dirs_skipped: traversal.dirs_skipped,
            walk_errors: traversal.walk_errors,
            excluded: traversal.excluded,
            duration,
            completed,
        })
    }
}
