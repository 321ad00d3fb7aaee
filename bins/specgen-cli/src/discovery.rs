// Source file discovery
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Every file under `root` with the given extension, in lexicographic order.
///
/// The whole list is collected up front so files written while the caller
/// processes it are never picked up. If `skip` names a directory inside
/// `root` (the destination, usually), that subtree is not entered.
pub fn find_sources(root: &Path, extension: &str, skip: Option<&Path>) -> Vec<PathBuf> {
    let skip = skip.and_then(|p| p.canonicalize().ok());

    // depth 0 is the root itself, which is never "under" the root
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            match (&skip, entry.path().canonicalize()) {
                (Some(skip), Ok(path)) if &path == skip => {
                    debug!(dir = %entry.path().display(), "Skipping destination directory");
                    false
                }
                _ => true,
            }
        });

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        // Symlinked files count, symlinked directories are not descended
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && entry.path().extension() == Some(OsStr::new(extension)) {
            found.push(entry.into_path());
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn relative(root: &Path, found: Vec<PathBuf>) -> Vec<String> {
        found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_finds_matching_files_sorted() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b/test.scss");
        touch(dir.path(), "a/b/test1.scss");
        touch(dir.path(), "a/test2.scss");
        touch(dir.path(), "a/notes.txt");
        touch(dir.path(), "a/style.css");

        let found = find_sources(dir.path(), "scss", None);

        assert_eq!(
            relative(dir.path(), found),
            vec!["a/b/test1.scss", "a/test2.scss", "b/test.scss"]
        );
    }

    #[test]
    fn test_skips_destination_subtree() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.scss");
        touch(dir.path(), "test-suite/a/input.scss");

        let skip = dir.path().join("test-suite");
        let found = find_sources(dir.path(), "scss", Some(&skip));

        assert_eq!(relative(dir.path(), found), vec!["a.scss"]);
    }

    #[test]
    fn test_file_root_finds_nothing() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "only.scss");

        let found = find_sources(&dir.path().join("only.scss"), "scss", None);
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_root_finds_nothing() {
        let dir = tempdir().unwrap();
        let found = find_sources(&dir.path().join("absent"), "scss", None);
        assert!(found.is_empty());
    }
}
