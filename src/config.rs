//! Configuration types for xattr-rename
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use clap::Parser;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Worker count used when the CPU count is unavailable
const FALLBACK_WORKERS: usize = 4;

/// Minimum queue size
const MIN_QUEUE_SIZE: usize = 1;

/// Default job queue capacity
pub const DEFAULT_QUEUE_SIZE: usize = 100;

/// Default number of files per block in the progress stream
pub const DEFAULT_BLOCK_SIZE: usize = 10;

/// Default number of blocks per row in the progress stream
pub const DEFAULT_ROW_SIZE: usize = 10;

/// Rename extended attributes of files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "xattr-rename",
    version,
    about = "Rename extended attributes of files",
    long_about = "Moves the value of one extended attribute to a new attribute name on every \
                  given file, then removes the old attribute.\n\n\
                  Files are processed in parallel. Empty files are skipped. The move is not \
                  atomic: if removing the old name fails, both names remain on the file.",
    after_help = "EXAMPLES:\n    \
        xattr-rename -S user.class -X user.classification file1 file2\n    \
        xattr-rename -S user.class -X user.classification -r -v /data\n    \
        xattr-rename -S user.class -X user.classification -r -v -b 50 -R 20 /data\n    \
        xattr-rename -S user.class -X user.classification -r --debug /data  # dry run"
)]
pub struct CliArgs {
    /// Target extended attribute name
    #[arg(short = 'X', long = "xattr", value_name = "NAME")]
    pub xattr: String,

    /// Source extended attribute name
    #[arg(short = 'S', long = "source-xattr", value_name = "NAME")]
    pub source_xattr: String,

    /// Recurse into directories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Enable verbose output (one progress symbol per file)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Number of files per block in verbose mode
    #[arg(short = 'b', long, default_value_t = DEFAULT_BLOCK_SIZE, value_name = "NUM")]
    pub block_size: usize,

    /// Number of blocks per row in verbose mode
    #[arg(short = 'R', long, default_value_t = DEFAULT_ROW_SIZE, value_name = "NUM")]
    pub row_size: usize,

    /// Enable debug mode: print the source attribute instead of renaming (disables verbose)
    #[arg(long)]
    pub debug: bool,

    /// Number of worker threads
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Job queue size (bounds how far discovery runs ahead of processing)
    #[arg(long, default_value_t = DEFAULT_QUEUE_SIZE, value_name = "NUM")]
    pub queue_size: usize,

    /// Maximum directory depth when recursing (unlimited if not set)
    #[arg(short = 'd', long, value_name = "NUM")]
    pub max_depth: Option<usize>,

    /// Exclude paths matching pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Debug-level diagnostics on stderr
    #[arg(long)]
    pub log_debug: bool,

    /// Files or directories to process
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// Default worker count: one per CPU
pub fn default_workers() -> usize {
    match num_cpus::get() {
        0 => FALLBACK_WORKERS,
        n => n.min(MAX_WORKERS),
    }
}

/// Validated runtime configuration
///
/// Immutable for the whole run; shared with every worker through an `Arc`.
#[derive(Debug, Clone)]
pub struct RenameConfig {
    /// Attribute name the value is moved to
    pub target_xattr: String,

    /// Attribute name the value is moved from
    pub source_xattr: String,

    /// Root paths given on the command line
    pub paths: Vec<PathBuf>,

    /// Recurse into directories
    pub recursive: bool,

    /// Render the progress stream
    pub verbose: bool,

    /// Dry-run inspection instead of renaming
    pub debug: bool,

    /// Files per block marker
    pub block_size: usize,

    /// Blocks per row marker
    pub row_size: usize,

    /// Number of worker threads
    pub worker_count: usize,

    /// Job queue capacity
    pub queue_size: usize,

    /// Maximum traversal depth below each root
    pub max_depth: Option<usize>,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,
}

impl RenameConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.paths.is_empty() {
            return Err(ConfigError::NoPaths);
        }

        if args.xattr.is_empty() {
            return Err(ConfigError::EmptyAttributeName { flag: "--xattr" });
        }
        if args.source_xattr.is_empty() {
            return Err(ConfigError::EmptyAttributeName {
                flag: "--source-xattr",
            });
        }
        // set-then-remove on the same name would delete the attribute
        if args.xattr == args.source_xattr {
            return Err(ConfigError::SameAttribute { name: args.xattr });
        }

        if args.block_size == 0 {
            return Err(ConfigError::InvalidGrouping {
                what: "block size",
                size: args.block_size,
            });
        }
        if args.row_size == 0 {
            return Err(ConfigError::InvalidGrouping {
                what: "row size",
                size: args.row_size,
            });
        }

        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        if args.queue_size < MIN_QUEUE_SIZE {
            return Err(ConfigError::InvalidQueueSize {
                size: args.queue_size,
                min: MIN_QUEUE_SIZE,
            });
        }

        let exclude_patterns = args
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            target_xattr: args.xattr,
            source_xattr: args.source_xattr,
            paths: args.paths,
            recursive: args.recursive,
            // debug output and the progress stream are mutually exclusive
            verbose: args.verbose && !args.debug,
            debug: args.debug,
            block_size: args.block_size,
            row_size: args.row_size,
            worker_count: args.workers,
            queue_size: args.queue_size,
            max_depth: args.max_depth,
            exclude_patterns,
        })
    }

    /// Number of files per row marker
    pub fn row_span(&self) -> u64 {
        (self.block_size as u64).saturating_mul(self.row_size as u64)
    }

    /// Check if a path should be excluded
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude_patterns.is_empty() {
            return false;
        }
        let path = path.to_string_lossy();
        self.exclude_patterns.iter().any(|re| re.is_match(&path))
    }
}
