//! Error types for section stores and path discovery.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`DocumentStore`](crate::store::DocumentStore).
///
/// Absence is never an error: a missing directory or section reads as an
/// empty document. `PermissionDenied` is kept apart from every other I/O
/// failure because the resolver recovers from it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Permission denied writing {}: {source}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed JSON in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON object at the top level of {}", path.display())]
    NotAnObject { path: PathBuf },
}

impl StoreError {
    /// Classify an I/O error for `path`, splitting out permission failures.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            StoreError::PermissionDenied { path, source }
        } else {
            StoreError::Io { path, source }
        }
    }

    /// Whether the failure is a write to a directory the process may not modify.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::PermissionDenied { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised while locating the user and environment config roots.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Cannot locate the user config directory: set JUPYTER_CONFIG_DIR or HOME")]
    NoUserDir,

    #[error("Cannot locate the environment config directory: no CONDA_PREFIX or VIRTUAL_ENV set")]
    NoEnvironmentPrefix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_classified() {
        let err = StoreError::from_io(
            "/etc/jupyter/nbconfig/notebook.json",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("notebook.json"));
    }

    #[test]
    fn test_other_io_errors_are_not_permission() {
        let err = StoreError::from_io("/tmp/x", io::Error::from(io::ErrorKind::Other));
        assert!(!err.is_permission_denied());
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
