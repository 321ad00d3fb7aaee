// Run options and test-suite layout configuration
use crate::error::TransformError;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_DIR: &str = ".";
pub const DEFAULT_DEST_DIR: &str = "./test-suite/";

/// Environment variable that overrides the compiler command.
pub const COMPILER_ENV: &str = "SASS_COMPILER";

/// Options resolved once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub source_dir: String,
    /// Always ends with `/`.
    pub dest_dir: String,
    pub verbose: bool,
    pub prune_empty: bool,
    pub config_path: Option<PathBuf>,
}

impl Options {
    pub fn new(source_dir: impl Into<String>, dest_dir: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: normalize_dest(dest_dir.into()),
            verbose: false,
            prune_empty: false,
            config_path: None,
        }
    }

    pub fn source_root(&self) -> &Path {
        Path::new(&self.source_dir)
    }

    pub fn dest_root(&self) -> &Path {
        Path::new(&self.dest_dir)
    }

    /// A destination that already exists must be a directory.
    pub fn validate_destination(&self) -> Result<(), TransformError> {
        // stat("file.txt/") fails with ENOTDIR, so look at the path without the separator
        let trimmed = self.dest_dir.trim_end_matches('/');
        let dest = Path::new(if trimmed.is_empty() { "/" } else { trimmed });
        if dest.exists() && !dest.is_dir() {
            return Err(TransformError::InvalidDestination(PathBuf::from(&self.dest_dir)));
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_DIR, DEFAULT_DEST_DIR)
    }
}

/// Append a trailing `/` if the path lacks one.
pub fn normalize_dest(mut dest: String) -> String {
    if !dest.ends_with('/') {
        dest.push('/');
    }
    dest
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: "sass".to_string(),
            args: vec![],
        }
    }
}

/// Names and tools that shape the generated test suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub compiler: CompilerConfig,
    /// Extension of discovered source files, without the dot.
    pub source_extension: String,
    pub input_file: String,
    pub output_file: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            compiler: CompilerConfig::default(),
            source_extension: "scss".to_string(),
            input_file: "input.scss".to_string(),
            output_file: "expected_output.css".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Load a layout from a JSON file. Missing fields keep their defaults.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("Layout config file not found: {}", config_path.display());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let layout: LayoutConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        layout.validate()?;
        Ok(layout)
    }

    /// Load from `path` if given, otherwise defaults; then apply `SASS_COMPILER`.
    pub fn resolve(config_path: Option<&Path>) -> Result<Self> {
        let mut layout = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Ok(command) = std::env::var(COMPILER_ENV) {
            if !command.is_empty() {
                layout.compiler.command = command;
            }
        }

        Ok(layout)
    }

    fn validate(&self) -> Result<()> {
        if self.compiler.command.is_empty() {
            bail!("compiler.command cannot be empty");
        }
        if self.source_extension.is_empty() || self.source_extension.starts_with('.') {
            bail!(
                "source_extension must be a bare extension like \"scss\", got {:?}",
                self.source_extension
            );
        }
        for name in [&self.input_file, &self.output_file] {
            if name.is_empty() || name.contains('/') {
                bail!("input_file and output_file must be plain file names, got {:?}", name);
            }
        }
        if self.input_file == self.output_file {
            bail!("input_file and output_file must differ");
        }
        Ok(())
    }
}
