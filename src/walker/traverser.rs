//! File discovery
//!
//! Walks the root paths and feeds one [`Job`] per non-directory into the
//! job queue:
//!
//! - root cannot be stat'd: logged, root skipped
//! - root is not a directory: one job
//! - root is a directory, recursion off: skipped silently
//! - root is a directory, recursion on: one job per non-directory entry in
//!   walk order; a walk error is logged and ends that root's walk only
//!
//! Symlinks inside a walked tree are not followed; they are queued like files.

use crate::config::RenameConfig;
use crate::error::WorkerError;
use crate::walker::queue::{Job, JobSender};
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Counters collected while traversing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraverseStats {
    /// Jobs sent to the queue
    pub jobs: u64,

    /// Roots that could not be stat'd
    pub roots_skipped: u64,

    /// Directory roots ignored because recursion is off
    pub dirs_skipped: u64,

    /// Walks aborted by an error
    pub walk_errors: u64,

    /// Paths dropped by an exclude pattern
    pub excluded: u64,

    /// False if traversal stopped on shutdown
    pub completed: bool,
}

/// Why traversal stopped early
enum Halt {
    Shutdown,
    QueueClosed,
}

/// Producer side of the pipeline
pub struct Traverser {
    config: Arc<RenameConfig>,
    shutdown: Arc<AtomicBool>,
}

impl Traverser {
    /// Create a traverser for the configured roots
    pub fn new(config: Arc<RenameConfig>, shutdown: Arc<AtomicBool>) -> Self {
        Self { config, shutdown }
    }

    /// Walk every root, then close the queue by dropping `sender`
    ///
    /// Setting the shutdown flag ends the run with `completed == false`,
    /// even while a send is waiting on a full queue.
    pub fn run(&self, sender: JobSender) -> Result<TraverseStats, WorkerError> {
        let mut stats = TraverseStats::default();

        for root in &self.config.paths {
            match self.visit_root(root, &sender, &mut stats) {
                Ok(()) => {}
                Err(Halt::Shutdown) => {
                    debug!(jobs = stats.jobs, "Traversal stopped by shutdown");
                    return Ok(stats);
                }
                Err(Halt::QueueClosed) => return Err(WorkerError::QueueClosed),
            }
        }

        stats.completed = true;
        debug!(jobs = stats.jobs, "Traversal complete");
        Ok(stats)
    }

    fn visit_root(&self, root: &Path, sender: &JobSender, stats: &mut TraverseStats) -> Result<(), Halt> {
        if self.config.is_excluded(root) {
            stats.excluded += 1;
            return Ok(());
        }

        let metadata = match fs::metadata(root) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %root.display(), error = %e, "Error stating root, skipping");
                stats.roots_skipped += 1;
                return Ok(());
            }
        };

        if !metadata.is_dir() {
            return self.enqueue(root, sender, stats);
        }

        if !self.config.recursive {
            trace!(path = %root.display(), "Directory skipped (not recursive)");
            stats.dirs_skipped += 1;
            return Ok(());
        }

        self.walk(root, sender, stats)
    }

    fn walk(&self, root: &Path, sender: &JobSender, stats: &mut TraverseStats) -> Result<(), Halt> {
        let mut walker = WalkDir::new(root);
        if let Some(depth) = self.config.max_depth {
            // depth 0 is the root itself
            walker = walker.max_depth(depth.saturating_add(1));
        }

        let mut entries = walker.into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(path = %root.display(), error = %e, "Error walking directory");
                    stats.walk_errors += 1;
                    return Ok(());
                }
            };

            let is_dir = entry.file_type().is_dir();
            if entry.depth() > 0 && self.config.is_excluded(entry.path()) {
                if is_dir {
                    entries.skip_current_dir();
                }
                stats.excluded += 1;
                continue;
            }

            if !is_dir {
                self.enqueue(entry.path(), sender, stats)?;
            }
        }

        Ok(())
    }

    fn enqueue(&self, path: &Path, sender: &JobSender, stats: &mut TraverseStats) -> Result<(), Halt> {
        match sender.send(Job::new(path), &self.shutdown) {
            Ok(()) => {
                stats.jobs += 1;
                Ok(())
            }
            Err(WorkerError::Cancelled) => Err(Halt::Shutdown),
            Err(_) => Err(Halt::QueueClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliArgs;
    use crate::walker::queue::JobQueue;
    use clap::Parser;
    use std::path::PathBuf;
    use std::sync::atomic::Ordering;
    use tempfile::{tempdir, TempDir};

    fn config(extra: &[&str], paths: &[&Path]) -> Arc<RenameConfig> {
        let mut argv: Vec<String> = ["xattr-rename", "-S", "user.a", "-X", "user.b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        argv.extend(extra.iter().map(|s| s.to_string()));
        argv.extend(paths.iter().map(|p| p.display().to_string()));
        Arc::new(RenameConfig::from_args(CliArgs::try_parse_from(argv).unwrap()).unwrap())
    }

    /// root/top.txt and root/sub/nested.txt
    fn tree() -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("top.txt"), b"1").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("nested.txt"), b"2").unwrap();
        dir
    }

    fn collect(config: Arc<RenameConfig>) -> (TraverseStats, Vec<PathBuf>) {
        let (sender, receiver) = JobQueue::new(100).split();
        let stats = Traverser::new(config, Arc::new(AtomicBool::new(false)))
            .run(sender)
            .unwrap();
        let mut paths = Vec::new();
        while let Some(job) = receiver.recv() {
            paths.push(job.path);
        }
        paths.sort();
        (stats, paths)
    }

    #[test]
    fn test_file_roots_enqueued() {
        let dir = tree();
        let file = dir.path().join("top.txt");
        let (stats, paths) = collect(config(&[], &[&file]));

        assert_eq!(paths, vec![file]);
        assert_eq!(stats.jobs, 1);
        assert!(stats.completed);
    }

    #[test]
    fn test_directory_skipped_without_recursion() {
        let dir = tree();
        let (stats, paths) = collect(config(&[], &[dir.path()]));

        assert!(paths.is_empty());
        assert_eq!(stats.dirs_skipped, 1);
        assert_eq!(stats.roots_skipped, 0);
    }

    #[test]
    fn test_recursive_walk_enqueues_all_files() {
        let dir = tree();
        let (stats, paths) = collect(config(&["-r"], &[dir.path()]));

        assert_eq!(
            paths,
            vec![
                dir.path().join("sub").join("nested.txt"),
                dir.path().join("top.txt"),
            ]
        );
        assert_eq!(stats.jobs, 2);
    }

    #[test]
    fn test_max_depth_limits_recursion() {
        let dir = tree();
        let (_, paths) = collect(config(&["-r", "-d", "0"], &[dir.path()]));
        assert_eq!(paths, vec![dir.path().join("top.txt")]);
    }

    #[test]
    fn test_missing_root_skipped_others_processed() {
        let dir = tree();
        let missing = dir.path().join("missing");
        let file = dir.path().join("top.txt");
        let (stats, paths) = collect(config(&[], &[&missing, &file]));

        assert_eq!(paths, vec![file]);
        assert_eq!(stats.roots_skipped, 1);
        assert!(stats.completed);
    }

    #[test]
    fn test_exclude_prunes_subtree() {
        let dir = tree();
        let (stats, paths) = collect(config(&["-r", "--exclude", "/sub$"], &[dir.path()]));

        assert_eq!(paths, vec![dir.path().join("top.txt")]);
        assert_eq!(stats.excluded, 1);
    }

    #[test]
    fn test_shutdown_stops_enqueueing() {
        let dir = tree();
        let (sender, receiver) = JobQueue::new(10).split();
        let traverser = Traverser::new(config(&["-r"], &[dir.path()]), Arc::new(AtomicBool::new(true)));

        let stats = traverser.run(sender).unwrap();

        assert!(!stats.completed);
        assert_eq!(stats.jobs, 0);
        assert_eq!(receiver.recv(), None);
    }

    #[test]
    fn test_shutdown_releases_send_on_full_queue() {
        let dir = tempdir().unwrap();
        let files: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = dir.path().join(format!("f{}", i));
                fs::write(&path, b"data").unwrap();
                path
            })
            .collect();
        let roots: Vec<&Path> = files.iter().map(|p| p.as_path()).collect();

        // One slot and nobody receiving: the second send blocks
        let (sender, _receiver) = JobQueue::new(1).split();
        let shutdown = Arc::new(AtomicBool::new(false));
        let setter = {
            let shutdown = Arc::clone(&shutdown);
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(100));
                shutdown.store(true, Ordering::SeqCst);
            })
        };

        let stats = Traverser::new(config(&[], &roots), shutdown).run(sender).unwrap();
        setter.join().unwrap();

        assert!(!stats.completed);
        assert_eq!(stats.jobs, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_error_ends_only_that_root() {
        use std::os::unix::fs::PermissionsExt;

        let first = tempdir().unwrap();
        let locked = first.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), b"1").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let second = tempdir().unwrap();
        let file = second.path().join("visible.txt");
        fs::write(&file, b"2").unwrap();

        let (stats, paths) = collect(config(&["-r"], &[first.path(), second.path()]));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(stats.walk_errors, 1);
        assert_eq!(paths, vec![file]);
        assert!(stats.completed);
    }
}
