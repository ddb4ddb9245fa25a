//! Existence and classification checks.

use std::path::Path;

use crate::{EntryType, FsError};

/// Existence checks, classification, and the "cannot overwrite" factories.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access; backends manage their own synchronization.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsEntry`.
pub trait FsEntry: Send + Sync {
    /// Returns `true` if `path` exists and is a file.
    ///
    /// A directory or a missing path answers `false`. Only unexpected backend
    /// failures produce an error; "not found" never does.
    fn exists_file(&self, path: &Path) -> Result<bool, FsError>;

    /// Returns `true` if `path` exists and is a directory.
    ///
    /// A file or a missing path answers `false`.
    fn exists_directory(&self, path: &Path) -> Result<bool, FsError>;

    /// Classify the entry at `path`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if neither a file nor a directory exists there
    fn entry_type(&self, path: &Path) -> Result<EntryType, FsError>;

    /// Wording used for the "overwrite refused" condition.
    fn cannot_overwrite_message(&self, path: &Path) -> String {
        format!("cannot overwrite existing file: {}", path.display())
    }

    /// Error value for the "overwrite refused" condition.
    ///
    /// Every backend and every derived operation raises exactly this value when
    /// a destination exists and overwriting was not requested.
    fn cannot_overwrite_error(&self, path: &Path) -> FsError {
        FsError::CannotOverwrite {
            path: path.to_path_buf(),
            message: self.cannot_overwrite_message(path),
        }
    }
}
