//! Error types for shellpilot core.

use thiserror::Error;

use crate::backend::BackendError;
use crate::storage::StorageError;

/// Errors raised while setting up a session.
///
/// Errors on the execution path never surface here; they are recorded on the
/// scrollback entry they belong to.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend client errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Result type alias for shellpilot operations.
pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ShellError = StorageError::from(io_err).into();
        match err {
            ShellError::Storage(StorageError::Io(_)) => {}
            _ => panic!("Expected Storage error variant"),
        }
    }

    #[test]
    fn test_backend_error_display() {
        let err: ShellError = BackendError::Transport("refused".to_string()).into();
        assert_eq!(err.to_string(), "Backend error: refused");
    }
}
