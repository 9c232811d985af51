use std::path::PathBuf;
use thiserror::Error;

use crate::exitcode;

#[derive(Error, Debug)]
pub enum CriticalError {
    #[error("cannot read stylesheet {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write critical output {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type CriticalResult<T> = Result<T, CriticalError>;

impl CriticalError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CriticalError::ReadFailed { .. } => exitcode::NOINPUT,
            CriticalError::WriteFailed { .. } => exitcode::CANTCREAT,
            CriticalError::Parse { .. } => exitcode::DATAERR,
            CriticalError::Config(_) => exitcode::CONFIG,
        }
    }
}
