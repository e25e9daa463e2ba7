//! Read-only preview used by `--debug`
//!
//! Shows what a rename would carry without mutating anything: one line per
//! file that has the source attribute, nothing for files that don't.

use crate::config::RenameConfig;
use crate::store::AttributeStore;
use std::path::Path;

/// Format one inspection line: `<target> <value> <path>`
///
/// Non-UTF-8 value bytes are replaced lossily.
pub fn format_inspection(target: &str, value: &[u8], path: &Path) -> String {
    format!(
        "{} {} {}",
        target,
        String::from_utf8_lossy(value),
        path.display()
    )
}

/// Read the source attribute and build the inspection line
///
/// Returns `None` when the attribute cannot be read; that case is silent.
pub fn inspect_file<S>(store: &S, path: &Path, config: &RenameConfig) -> Option<String>
where
    S: AttributeStore + ?Sized,
{
    let value = store.get(path, &config.source_xattr).ok()?;
    Some(format_inspection(&config.target_xattr, &value, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliArgs;
    use crate::store::MemoryStore;
    use clap::Parser;

    fn config() -> RenameConfig {
        let args = CliArgs::try_parse_from([
            "xattr-rename",
            "-S",
            "user.tag",
            "-X",
            "user.tag2",
            "--debug",
            "f",
        ])
        .unwrap();
        RenameConfig::from_args(args).unwrap()
    }

    #[test]
    fn test_inspect_prints_target_value_path() {
        let store = MemoryStore::new();
        store.insert("/data/a.txt", "user.tag", b"secret");

        let line = inspect_file(&store, Path::new("/data/a.txt"), &config());

        assert_eq!(line.as_deref(), Some("user.tag2 secret /data/a.txt"));
    }

    #[test]
    fn test_inspect_missing_attribute_is_silent() {
        let store = MemoryStore::new();
        assert_eq!(inspect_file(&store, Path::new("/data/a.txt"), &config()), None);
    }

    #[test]
    fn test_inspect_never_mutates() {
        let store = MemoryStore::new();
        store.insert("/data/a.txt", "user.tag", b"secret");

        inspect_file(&store, Path::new("/data/a.txt"), &config());
        inspect_file(&store, Path::new("/data/b.txt"), &config());

        let calls = store.calls();
        assert_eq!(calls.gets, 2);
        assert_eq!(calls.sets, 0);
        assert_eq!(calls.removes, 0);
        assert_eq!(
            store.names(Path::new("/data/a.txt")),
            vec!["user.tag".to_string()]
        );
    }

    #[test]
    fn test_format_lossy_value() {
        let line = format_inspection("user.t", &[b'a', 0xff, b'b'], Path::new("/f"));
        assert_eq!(line, "user.t a\u{fffd}b /f");
    }
}
