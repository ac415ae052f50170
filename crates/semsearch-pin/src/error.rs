//! Error types for manifest pinning.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while pinning a manifest.
///
/// A package that is not installed is not an error; it is reported as
/// [`crate::LineOutcome::Unresolved`].
#[derive(Debug, Error)]
pub enum PinError {
    /// The manifest could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The rewritten manifest could not be written back.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The Python interpreter could not be started.
    #[error("failed to run {python}: {source}")]
    Interpreter {
        python: String,
        source: std::io::Error,
    },

    /// The Python interpreter ran but reported a failure.
    #[error("{python} exited with {status}: {stderr}")]
    InterpreterFailed {
        python: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The interpreter's `sys.path` could not be parsed.
    #[error("unexpected sys.path output: {0}")]
    SysPath(#[from] serde_json::Error),
}

/// Convenience alias for pinning results.
pub type PinResult<T> = std::result::Result<T, PinError>;
