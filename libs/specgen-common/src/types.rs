use crate::config::LayoutConfig;
use std::path::{Path, PathBuf};

/// One discovered source file and where its test lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub source_path: PathBuf,
    /// Source path below the search root, extension removed.
    pub relative_path: PathBuf,
    pub dest_dir: PathBuf,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl TestCase {
    /// Returns `None` when `source_path` is not below `source_root`.
    pub fn new(
        source_root: &Path,
        dest_root: &Path,
        source_path: &Path,
        layout: &LayoutConfig,
    ) -> Option<Self> {
        let rest = source_path.strip_prefix(source_root).ok()?;
        if rest.as_os_str().is_empty() {
            return None;
        }
        let relative_path = rest.with_extension("");
        let dest_dir = dest_root.join(&relative_path);

        Some(Self {
            source_path: source_path.to_path_buf(),
            input_path: dest_dir.join(&layout.input_file),
            output_path: dest_dir.join(&layout.output_file),
            relative_path,
            dest_dir,
        })
    }
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Every source file discovered.
    pub found: usize,
    /// Test cases whose compiler run succeeded.
    pub copied: usize,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.found - self.copied
    }
}
