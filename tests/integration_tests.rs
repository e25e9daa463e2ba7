//! Integration tests for xattr-rename
//!
//! Most tests run against the in-memory store. Tests touching real extended
//! attributes return early when the temp filesystem does not support them.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;
use xattr_rename::config::{CliArgs, RenameConfig};
use xattr_rename::progress::{OutputSink, SharedBuffer};
use xattr_rename::store::{AttributeStore, MemoryStore, SystemStore};
use xattr_rename::walker::{RenameCoordinator, RunSummary};

fn config(extra: &[&str], paths: &[&Path]) -> RenameConfig {
    let mut argv: Vec<String> = ["xattr-rename", "-S", "user.tag", "-X", "user.tag2"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    argv.extend(extra.iter().map(|s| s.to_string()));
    argv.extend(paths.iter().map(|p| p.display().to_string()));
    RenameConfig::from_args(CliArgs::try_parse_from(argv).unwrap()).unwrap()
}

fn run(config: RenameConfig, store: Arc<dyn AttributeStore>) -> (RunSummary, String) {
    let buf = SharedBuffer::new();
    let summary = RenameCoordinator::new(config, store)
        .with_output(OutputSink::new(buf.clone()))
        .run()
        .unwrap();
    (summary, buf.contents())
}

fn write_file(path: &Path, content: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

#[test]
fn test_recursion_scoping() {
    let dir = tempdir().unwrap();
    let top = write_file(&dir.path().join("top.txt"), b"1");
    let nested = write_file(&dir.path().join("sub/nested.txt"), b"2");

    let store = Arc::new(MemoryStore::new());
    store.insert(&top, "user.tag", b"a");
    store.insert(&nested, "user.tag", b"b");

    // non-recursive: the directory root yields nothing
    let (summary, _) = run(config(&[], &[dir.path()]), store.clone());
    assert_eq!(summary.jobs, 0);
    assert_eq!(summary.dirs_skipped, 1);
    assert_eq!(store.calls().total(), 0);

    let (summary, _) = run(config(&["-r"], &[dir.path()]), store.clone());
    assert_eq!(summary.jobs, 2);
    assert_eq!(summary.renamed, 2);
    assert_eq!(store.value(&top, "user.tag2"), Some(b"a".to_vec()));
    assert_eq!(store.value(&nested, "user.tag2"), Some(b"b".to_vec()));
}

#[test]
fn test_mixed_outcomes_progress_stream() {
    let dir = tempdir().unwrap();
    let renamed = write_file(&dir.path().join("renamed"), b"data");
    let empty = write_file(&dir.path().join("empty"), b"");
    let untagged = write_file(&dir.path().join("untagged"), b"data");

    let store = Arc::new(MemoryStore::new());
    store.insert(&renamed, "user.tag", b"x");
    store.insert(&empty, "user.tag", b"x");

    let (summary, out) = run(
        config(&["-v", "-b", "1", "-R", "3"], &[&renamed, &empty, &untagged]),
        store.clone(),
    );

    assert_eq!(summary.renamed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 1);

    // one symbol per file, a space after each, the row marker after the third
    let mut symbols: Vec<char> = out.chars().filter(|c| "+.!".contains(*c)).collect();
    symbols.sort();
    assert_eq!(symbols, vec!['!', '+', '.']);
    assert_eq!(out.matches(' ').count(), 3);
    assert!(out.ends_with("[3]\n\n"));

    // the empty file kept its attribute untouched
    assert_eq!(store.value(&empty, "user.tag"), Some(b"x".to_vec()));
    assert_eq!(store.value(&empty, "user.tag2"), None);
    // the untagged file never gained a target
    assert_eq!(store.value(&untagged, "user.tag2"), None);
}

#[test]
fn test_rerun_is_harmless() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir.path().join("f"), b"data");
    let store = Arc::new(MemoryStore::new());
    store.insert(&file, "user.tag", b"original");

    let (first, _) = run(config(&[], &[&file]), store.clone());
    assert_eq!(first.renamed, 1);

    let (second, out) = run(config(&["-v"], &[&file]), store.clone());
    assert_eq!(second.failed, 1);
    assert_eq!(out, "!\n");
    assert_eq!(store.value(&file, "user.tag2"), Some(b"original".to_vec()));
}

#[test]
fn test_debug_mode_is_read_only() {
    let dir = tempdir().unwrap();
    let tagged = write_file(&dir.path().join("tagged"), b"data");
    let untagged = write_file(&dir.path().join("untagged"), b"data");
    let store = Arc::new(MemoryStore::new());
    store.insert(&tagged, "user.tag", b"secret");

    let (summary, out) = run(config(&["--debug", "-v", "-r"], &[dir.path()]), store.clone());

    assert_eq!(out, format!("user.tag2 secret {}\n", tagged.display()));
    assert_eq!(summary.inspected, 1);
    assert_eq!(summary.renamed + summary.skipped + summary.failed, 0);
    assert_eq!(store.calls().sets, 0);
    assert_eq!(store.calls().removes, 0);
    assert_eq!(store.value(&tagged, "user.tag"), Some(b"secret".to_vec()));
    assert!(store.names(&untagged).is_empty());
}

#[test]
fn test_missing_root_does_not_stop_run() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir.path().join("f"), b"data");
    let store = Arc::new(MemoryStore::new());
    store.insert(&file, "user.tag", b"x");

    let (summary, out) = run(
        config(&["-v"], &[&dir.path().join("missing"), &file]),
        store.clone(),
    );

    assert_eq!(summary.roots_skipped, 1);
    assert_eq!(summary.renamed, 1);
    assert_eq!(out, "+\n");
}

#[test]
fn test_large_tree_with_small_queue() {
    let dir = tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    for d in 0..5 {
        for f in 0..60 {
            let path = write_file(&dir.path().join(format!("d{}/f{}", d, f)), b"data");
            store.insert(&path, "user.tag", b"x");
        }
    }

    let (summary, out) = run(
        config(&["-r", "-v", "-w", "4", "--queue-size", "2"], &[dir.path()]),
        store.clone(),
    );

    assert_eq!(summary.jobs, 300);
    assert_eq!(summary.renamed, 300);
    assert_eq!(out.matches('+').count(), 300);
    assert_eq!(out.matches(' ').count(), 30);
    assert!(out.contains("[100]\n"));
    assert!(out.contains("[200]\n"));
    assert!(out.ends_with("[300]\n\n"));
}

/// Returns false when the temp filesystem rejects user xattrs
fn xattrs_available(path: &Path) -> bool {
    SystemStore::is_supported() && xattr::set(path, "user.xattr_rename.probe", b"1").is_ok()
}

#[test]
fn test_system_store_end_to_end() {
    let dir = tempdir().unwrap();
    let probe = write_file(&dir.path().join("probe"), b"p");
    if !xattrs_available(&probe) {
        return;
    }

    let mut files = Vec::new();
    for i in 0..25 {
        let path = write_file(&dir.path().join(format!("f{:02}", i)), b"payload");
        xattr::set(&path, "user.tag", b"x").unwrap();
        files.push(path);
    }
    let roots: Vec<&Path> = files.iter().map(|p| p.as_path()).collect();

    let (summary, out) = run(
        config(&["-v", "-b", "10", "-R", "2"], &roots),
        Arc::new(SystemStore::new()),
    );

    assert_eq!(out, "++++++++++ ++++++++++ [20]\n+++++\n");
    assert_eq!(summary.renamed, 25);
    for path in &files {
        assert_eq!(xattr::get(path, "user.tag2").unwrap(), Some(b"x".to_vec()));
        assert_eq!(xattr::get(path, "user.tag").unwrap(), None);
    }
}
