//! Progress reporting for the rename pipeline
//!
//! Renders one symbol per processed file:
//!
//! ```text
//! +  renamed        .  skipped (empty)        !  failed
//! ```
//!
//! After every `block_size` files a space is written, and after every
//! `block_size * row_size` files the running count in brackets plus a line
//! break. With the defaults (10 and 10):
//!
//! ```text
//! ++++++++++ ++++++++++ ..+++++!++ ... ++++++++++ [100]
//! ++++++++++ +++
//! ```
//!
//! Workers finish files in any order, so symbols from different files
//! interleave freely. Each file's own symbol and markers are written under a
//! single lock and are never torn.

use crate::config::RenameConfig;
use crate::error::FileOutcome;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared, lock-protected output stream
///
/// Used for both the progress stream and debug inspection lines.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl OutputSink {
    /// Wrap any writer
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Write one complete line and flush
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.inner.lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }

    /// Write a fragment and flush, holding the lock for the whole write
    pub fn write_str(&self, s: &str) -> io::Result<()> {
        let mut out = self.inner.lock();
        out.write_all(s.as_bytes())?;
        out.flush()
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

/// In-memory writer whose contents can be read back
///
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Marks written for one file: its symbol plus any block/row markers
///
/// `count` is the running total including this file.
pub fn progress_marks(symbol: char, count: u64, block_size: u64, row_span: u64) -> String {
    let mut marks = String::with_capacity(16);
    marks.push(symbol);
    if count > 0 && block_size > 0 && count % block_size == 0 {
        marks.push(' ');
        if row_span > 0 && count % row_span == 0 {
            marks.push_str(&format!("[{}]\n", count));
        }
    }
    marks
}

/// Progress reporter that renders the per-file symbol stream
///
/// The counter is advanced for every recorded outcome; the stream is only
/// written when the reporter is enabled (verbose and not debug).
#[derive(Debug)]
pub struct ProgressReporter {
    /// Output stream
    sink: OutputSink,

    /// Whether symbols are written
    enabled: bool,

    /// Files per block
    block_size: u64,

    /// Files per row
    row_span: u64,

    /// Files processed so far
    processed: AtomicU64,
}

impl ProgressReporter {
    /// Create a reporter for a run
    pub fn new(config: &RenameConfig, sink: OutputSink) -> Self {
        Self::with_grouping(
            sink,
            config.verbose && !config.debug,
            config.block_size as u64,
            config.row_span(),
        )
    }

    /// Create a reporter with explicit grouping
    ///
    /// `row_span` is the number of files per row marker, not blocks per row.
    pub fn with_grouping(sink: OutputSink, enabled: bool, block_size: u64, row_span: u64) -> Self {
        Self {
            sink,
            enabled,
            block_size,
            row_span,
            processed: AtomicU64::new(0),
        }
    }

    /// Record one processed file and return the running count
    pub fn record(&self, outcome: &FileOutcome) -> io::Result<u64> {
        if !self.enabled {
            return Ok(self.processed.fetch_add(1, Ordering::Relaxed) + 1);
        }

        // Counter read and write share the lock so a row marker always
        // follows the symbol that completed the row.
        let mut out = self.sink.inner.lock();
        let count = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        let marks = progress_marks(outcome.symbol(), count, self.block_size, self.row_span);
        out.write_all(marks.as_bytes())?;
        out.flush()?;
        Ok(count)
    }

    /// Files recorded so far
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Whether the symbol stream is being written
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Write the trailing line break
    pub fn finish(&self) -> io::Result<()> {
        if self.enabled {
            self.sink.write_str("\n")?;
        }
        Ok(())
    }
}
