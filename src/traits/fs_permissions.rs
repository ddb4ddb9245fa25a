//! Permission changes.

use std::path::Path;

use crate::{FsError, Mode};

/// Permission management.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsPermissions`.
///
/// # Note
///
/// [`Mode`] is opaque; each backend documents what it does with the bits. A
/// backend without any permission model returns [`FsError::NotSupported`]
/// rather than silently ignoring the call.
pub trait FsPermissions: Send + Sync {
    /// Apply `mode` to a file or directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotSupported`] if the backend has no permission model
    fn change_permissions(&self, path: &Path, mode: Mode) -> Result<(), FsError>;
}
