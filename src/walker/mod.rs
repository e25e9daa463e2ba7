//! Parallel rename pipeline
//!
//! One producer discovers files and feeds a bounded queue; a fixed pool of
//! workers drains it.
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │       Traverser         │
//!                     │  - stat roots           │
//!                     │  - walkdir (recursive)  │
//!                     └───────────┬─────────────┘
//!                                 │ Job (path)
//!                     ┌───────────▼─────────────┐
//!                     │        JobQueue         │
//!                     │  (crossbeam bounded)    │
//!                     │  - backpressure         │
//!                     └───────────┬─────────────┘
//!       ┌─────────────────────────┼─────────────────────────┐
//!       │                         │                         │
//! ┌─────▼─────┐             ┌─────▼─────┐             ┌─────▼─────┐
//! │  Worker 1 │             │  Worker 2 │             │  Worker N │
//! │ get/set/  │             │ get/set/  │             │ get/set/  │
//! │ remove    │             │ remove    │             │ remove    │
//! └─────┬─────┘             └─────┬─────┘             └─────┬─────┘
//!       └─────────────────────────┼─────────────────────────┘
//!                     ┌───────────▼─────────────┐
//!                     │    ProgressReporter     │
//!                     │  + . !  [count]         │
//!                     └─────────────────────────┘
//! ```

pub mod coordinator;
pub mod queue;
pub mod traverser;
pub mod worker;

pub use coordinator::{RenameCoordinator, RunSummary};
pub use queue::{Job, JobQueue, JobReceiver, JobSender, QueueStats};
pub use traverser::{TraverseStats, Traverser};
pub use worker::{PoolTotals, Worker, WorkerContext, WorkerPool, WorkerStats};
