use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a whole command. Per-item problems never become one of
/// these; they are folded into a [`FailureKind`] and logged instead.
#[derive(Debug, Error)]
pub enum TidyError {
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("failed to write ledger {}: {source}", path.display())]
    Ledger { path: PathBuf, source: io::Error },

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("console I/O failed: {0}")]
    Console(#[source] io::Error),
}

impl TidyError {
    pub fn exit_code(&self) -> u8 {
        match self {
            TidyError::PathNotFound(_) | TidyError::NotADirectory(_) => crate::exit::INVALID_PATH,
            TidyError::Ledger { .. } => crate::exit::LEDGER_FAILED,
            _ => crate::exit::INTERNAL,
        }
    }
}

/// How a single filesystem item failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    PermissionDenied,
    NotFound,
    NotEmpty,
    Other(String),
}

impl FailureKind {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
            io::ErrorKind::NotFound => FailureKind::NotFound,
            io::ErrorKind::DirectoryNotEmpty => FailureKind::NotEmpty,
            _ => FailureKind::Other(err.to_string()),
        }
    }

    /// Permission and not-found failures are expected on a live filesystem
    /// and are only shown at debug verbosity.
    pub fn is_quiet(&self) -> bool {
        matches!(self, FailureKind::PermissionDenied | FailureKind::NotFound)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::PermissionDenied => write!(f, "permission denied"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::NotEmpty => write!(f, "directory is no longer empty"),
            FailureKind::Other(msg) => write!(f, "{msg}"),
        }
    }
}
