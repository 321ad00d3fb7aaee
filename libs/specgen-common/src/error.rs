use std::path::PathBuf;
use thiserror::Error;

/// Every way a run can go wrong.
///
/// Only `CompilerInvocation` is recoverable: it discards a single test case
/// and the run moves on. Everything else aborts the process with
/// [`TransformError::exit_code`].
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Must specify a {what} directory after {flags}.")]
    MissingRequiredValue { what: &'static str, flags: &'static str },

    #[error("Unknown option: {0:?} (make sure to include the '=' for options that require it)")]
    UnknownOption(String),

    #[error("Destination specified needs to not be a file. You specified {}.", .0.display())]
    InvalidDestination(PathBuf),

    #[error("There was a problem making a needed directory ({} in particular). Aborting rest of script.", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("There was a problem copying {} to {}. Aborting rest of script.", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the compiler didn't like the input {} and exited unsuccessfully ({reason}).", .input.display())]
    CompilerInvocation { input: PathBuf, reason: String },
}

impl TransformError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TransformError::MissingRequiredValue { .. } => 1,
            TransformError::UnknownOption(_) => 2,
            TransformError::InvalidDestination(_) => 3,
            TransformError::DirectoryCreation { .. } => 2,
            TransformError::Copy { .. } => 3,
            // Never terminates a run on its own; 1 if a caller insists.
            TransformError::CompilerInvocation { .. } => 1,
        }
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, TransformError::CompilerInvocation { .. })
    }
}
