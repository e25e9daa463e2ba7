//! Bounded job queue with backpressure
//!
//! The traverser sends one [`Job`] per discovered file; workers receive
//! them. When the queue is full the traverser blocks, which bounds how far
//! discovery can run ahead of processing on trees with millions of entries.
//!
//! The queue closes when every [`JobSender`] has been dropped. Receivers
//! then drain what is left and see `None`.
//!
//! A send blocked on a full queue wakes up periodically to check its cancel
//! flag, so a shutdown never leaves the producer stuck behind idle workers.

use crate::error::WorkerError;
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often a blocked send re-checks its cancel flag
const SEND_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A file to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Path as discovered (not canonicalized)
    pub path: PathBuf,
}

impl Job {
    /// Create a new job
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Statistics for the job queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total jobs enqueued
    pub enqueued: AtomicU64,

    /// Total jobs dequeued
    pub dequeued: AtomicU64,

    /// Sends that found the queue full and had to wait
    pub backpressure_events: AtomicU64,
}

impl QueueStats {
    /// Get queue throughput (dequeued jobs)
    pub fn throughput(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Get backpressure event count
    pub fn backpressure_count(&self) -> u64 {
        self.backpressure_events.load(Ordering::Relaxed)
    }
}

/// Bounded job queue
pub struct JobQueue {
    /// Sender for adding jobs
    sender: Sender<Job>,

    /// Receiver for taking jobs
    receiver: Receiver<Job>,

    /// Queue capacity
    capacity: usize,

    /// Queue statistics
    stats: Arc<QueueStats>,
}

impl JobQueue {
    /// Create a new job queue with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);

        Self {
            sender,
            receiver,
            capacity,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Split into the producer and consumer halves
    ///
    /// Dropping the returned sender (and every clone of it) closes the queue.
    pub fn split(self) -> (JobSender, JobReceiver) {
        let sender = JobSender {
            sender: self.sender,
            stats: Arc::clone(&self.stats),
        };
        let receiver = JobReceiver {
            receiver: self.receiver,
            stats: self.stats,
        };
        (sender, receiver)
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Get queue capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Handle for sending jobs to the queue
#[derive(Clone)]
pub struct JobSender {
    sender: Sender<Job>,
    stats: Arc<QueueStats>,
}

impl JobSender {
    /// Send a job, blocking while the queue is full
    ///
    /// Returns [`WorkerError::Cancelled`] once `cancel` is set, including
    /// when the receivers went away because of it. [`WorkerError::QueueClosed`]
    /// means every receiver is gone without a cancel.
    pub fn send(&self, mut job: Job, cancel: &AtomicBool) -> Result<(), WorkerError> {
        if self.sender.is_full() {
            self.stats.backpressure_events.fetch_add(1, Ordering::Relaxed);
        }

        loop {
            if cancel.load(Ordering::Relaxed) {
                return Err(WorkerError::Cancelled);
            }
            match self.sender.send_timeout(job, SEND_POLL_INTERVAL) {
                Ok(()) => {
                    self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                    return Ok(());
                }
                Err(SendTimeoutError::Timeout(returned)) => job = returned,
                Err(SendTimeoutError::Disconnected(_)) if cancel.load(Ordering::Relaxed) => {
                    return Err(WorkerError::Cancelled);
                }
                Err(SendTimeoutError::Disconnected(_)) => return Err(WorkerError::QueueClosed),
            }
        }
    }
}

/// Handle for receiving jobs from the queue
#[derive(Clone)]
pub struct JobReceiver {
    receiver: Receiver<Job>,
    stats: Arc<QueueStats>,
}

impl JobReceiver {
    /// Receive a job from the queue
    ///
    /// Blocks until a job is available. Returns `None` once the queue is
    /// closed and drained.
    pub fn recv(&self) -> Option<Job> {
        match self.receiver.recv() {
            Ok(job) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(job)
            }
            Err(_) => None,
        }
    }
}
