//! Error types for the operator contract.

use std::path::{Path, PathBuf};

/// File-system error type shared by every backend.
///
/// The kind of a failure is uniform across backends so callers can match on it
/// without knowing which backend answered. Wording inside
/// [`FsError::CannotOverwrite`] is produced by the backend's own
/// [`cannot_overwrite_message`](crate::FsEntry::cannot_overwrite_message).
///
/// # Examples
///
/// ```rust
/// use site_fs::FsError;
/// use std::path::PathBuf;
///
/// let err = FsError::NotFound { path: PathBuf::from("/missing") };
/// assert!(err.to_string().contains("/missing"));
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Path does not exist where existence is required.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Non-recursive delete of a directory that still has children.
    #[error("directory not empty: {path}")]
    DirectoryNotEmpty {
        /// The path to the non-empty directory.
        path: PathBuf,
    },

    /// Create, copy or move refused because the destination exists and
    /// overwriting was not requested.
    #[error("{message}")]
    CannotOverwrite {
        /// The destination that already exists.
        path: PathBuf,
        /// Backend-worded description.
        message: String,
    },

    /// Expected a file but found a directory.
    #[error("not a file: {path}")]
    NotAFile {
        /// The path that is not a file.
        path: PathBuf,
    },

    /// Expected a directory but found a file.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: PathBuf,
    },

    /// Operation is not supported by this backend.
    ///
    /// The answer of a backend without a permission model to
    /// [`FsPermissions::change_permissions`](crate::FsPermissions::change_permissions).
    #[error("operation not supported: {operation}")]
    NotSupported {
        /// The unsupported operation.
        operation: &'static str,
    },

    /// Invalid data encountered.
    #[error("invalid data: {path} ({details})")]
    InvalidData {
        /// The path with invalid data.
        path: PathBuf,
        /// Details about the invalid data.
        details: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Generic backend error.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Returns a mapper that attaches `operation` and `path` to an I/O error.
    ///
    /// `NotFound` keeps its own variant so callers can match on it regardless
    /// of which backend produced it.
    ///
    /// ```rust
    /// use site_fs::FsError;
    /// use std::path::Path;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    /// let err = FsError::io("read_file", Path::new("/a"))(io);
    /// assert!(matches!(err, FsError::NotFound { .. }));
    /// ```
    pub fn io(operation: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> FsError {
        let path = path.to_path_buf();
        move |source| match source.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound { path },
            _ => FsError::Io {
                operation,
                path,
                source,
            },
        }
    }

    /// Returns `true` for [`FsError::NotFound`].
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }

    /// Returns `true` for [`FsError::CannotOverwrite`].
    #[inline]
    pub fn is_cannot_overwrite(&self) -> bool {
        matches!(self, FsError::CannotOverwrite { .. })
    }
}

impl From<std::io::Error> for FsError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound {
                path: PathBuf::new(),
            },
            std::io::ErrorKind::DirectoryNotEmpty => FsError::DirectoryNotEmpty {
                path: PathBuf::new(),
            },
            _ => FsError::Io {
                operation: "io",
                path: PathBuf::new(),
                source: error,
            },
        }
    }
}

impl From<FsError> for std::io::Error {
    fn from(error: FsError) -> Self {
        match error {
            FsError::Io { source, .. } => source,
            FsError::NotFound { .. } => std::io::Error::new(std::io::ErrorKind::NotFound, error),
            FsError::CannotOverwrite { .. } => {
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, error)
            }
            FsError::NotSupported { .. } => {
                std::io::Error::new(std::io::ErrorKind::Unsupported, error)
            }
            other => std::io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_not_found_display() {
        let err = FsError::NotFound {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(err.to_string(), "not found: /missing");
    }

    #[test]
    fn fs_error_cannot_overwrite_uses_message() {
        let err = FsError::CannotOverwrite {
            path: PathBuf::from("/exists"),
            message: "refusing to overwrite /exists".into(),
        };
        assert_eq!(err.to_string(), "refusing to overwrite /exists");
        assert!(err.is_cannot_overwrite());
    }

    #[test]
    fn fs_error_from_io_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let fs_err = FsError::from(io_err);
        assert!(fs_err.is_not_found());
    }

    #[test]
    fn fs_error_from_io_directory_not_empty() {
        let io_err = std::io::Error::new(std::io::ErrorKind::DirectoryNotEmpty, "test");
        let fs_err = FsError::from(io_err);
        assert!(matches!(fs_err, FsError::DirectoryNotEmpty { .. }));
    }

    #[test]
    fn fs_error_from_io_other() {
        let io_err = std::io::Error::other("test");
        let fs_err = FsError::from(io_err);
        assert!(matches!(fs_err, FsError::Io { .. }));
    }

    #[test]
    fn io_mapper_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let fs_err = FsError::io("create_file", Path::new("/locked"))(io_err);
        match fs_err {
            FsError::Io {
                operation, path, ..
            } => {
                assert_eq!(operation, "create_file");
                assert_eq!(path, PathBuf::from("/locked"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn into_io_error_keeps_kind() {
        let err = FsError::CannotOverwrite {
            path: PathBuf::from("/x"),
            message: "x".into(),
        };
        let io: std::io::Error = err.into();
        assert_eq!(io.kind(), std::io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn unsupported_permissions_convert_to_unsupported_io() {
        let err = FsError::NotSupported {
            operation: "change_permissions",
        };
        assert_eq!(err.to_string(), "operation not supported: change_permissions");
        let io: std::io::Error = err.into();
        assert_eq!(io.kind(), std::io::ErrorKind::Unsupported);
    }
}
