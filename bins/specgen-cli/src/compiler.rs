//! Compiler boundary
//!
//! The transform pass only needs "turn this input into that output file,
//! tell me if it worked". Production shells out to an external stylesheet
//! compiler; tests plug in a fake.

use specgen_common::config::CompilerConfig;
use specgen_common::TransformError;
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

pub trait Compiler {
    /// Compile `input`, writing the compiler's stdout to `output`.
    fn compile(&self, input: &Path, output: &Path) -> Result<(), TransformError>;
}

/// Runs `<command> <args..> <input> > <output>`.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    command: String,
    args: Vec<String>,
}

impl ExternalCompiler {
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }
}

impl Compiler for ExternalCompiler {
    fn compile(&self, input: &Path, output: &Path) -> Result<(), TransformError> {
        let failure = |reason: String| TransformError::CompilerInvocation {
            input: input.to_path_buf(),
            reason,
        };

        let stdout = File::create(output)
            .map_err(|e| failure(format!("cannot create {}: {}", output.display(), e)))?;

        debug!(command = %self.command, input = %input.display(), "Running compiler");

        let status = Command::new(&self.command)
            .args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| failure(format!("failed to execute {}: {}", self.command, e)))?;

        if !status.success() {
            return Err(failure(match status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            }));
        }

        Ok(())
    }
}
