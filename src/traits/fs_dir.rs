//! Directory operations and enumeration.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{Entry, FsError};

/// Directory operations for a storage backend.
///
/// # Enumeration
///
/// The `enumerate_*` methods return an [`Enumeration`]: a finite, single-pass
/// sequence reflecting the directory at enumeration time. Whether later
/// mutations are visible while iterating is backend-defined and documented on
/// each backend. Non-recursive forms yield direct children only.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsDir`.
pub trait FsDir: Send + Sync {
    /// Delete a directory.
    ///
    /// Idempotent: an absent directory is a successful no-op.
    ///
    /// # Errors
    ///
    /// - [`FsError::DirectoryNotEmpty`] if `recursive` is `false` and the
    ///   directory has children
    /// - [`FsError::NotADirectory`] if the path is a file
    fn delete_directory(&self, path: &Path, recursive: bool) -> Result<(), FsError>;

    /// Create a directory and any missing parents.
    ///
    /// Succeeds if the directory already exists.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotADirectory`] if a component of the path is a file
    fn create_directory(&self, path: &Path) -> Result<(), FsError>;

    /// Paths of every child (files and directories).
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the directory does not exist
    fn enumerate_entry_paths(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Enumeration<PathBuf>, FsError>;

    /// Paths of direct child directories.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the directory does not exist
    fn enumerate_directories(&self, path: &Path) -> Result<Enumeration<PathBuf>, FsError>;

    /// Paths of direct child files.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the directory does not exist
    fn enumerate_files(&self, path: &Path) -> Result<Enumeration<PathBuf>, FsError>;

    /// Descriptors of every child, each classified as file or directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the directory does not exist
    fn enumerate_entries(&self, path: &Path, recursive: bool)
    -> Result<Enumeration<Entry>, FsError>;

    /// Last-modified time of a directory, in UTC.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the directory does not exist
    fn directory_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError>;

    /// Copy a directory tree within this backend.
    ///
    /// Conflicting files at the destination are always overwritten.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the source does not exist
    fn copy_directory(&self, source: &Path, destination: &Path) -> Result<(), FsError>;

    /// Move a directory tree within this backend.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the source does not exist
    fn move_directory(&self, source: &Path, destination: &Path) -> Result<(), FsError>;
}

/// Lazy, single-pass sequence returned by enumeration calls.
///
/// Wraps a boxed iterator so each backend can stream results its own way.
///
/// - Outer `Result` (from the `enumerate_*` call) = "can I open this directory?"
/// - Inner `Result` (per item) = "can I read this entry?"
///
/// # Example
///
/// ```rust
/// use site_fs::{Enumeration, FsError};
/// use std::path::PathBuf;
///
/// let listing = Enumeration::from_vec(vec![Ok(PathBuf::from("/a")), Ok(PathBuf::from("/b"))]);
/// let paths: Vec<PathBuf> = listing.collect_all()?;
/// assert_eq!(paths.len(), 2);
/// # Ok::<(), FsError>(())
/// ```
pub struct Enumeration<T>(Box<dyn Iterator<Item = Result<T, FsError>> + Send + 'static>);

impl<T: 'static> Enumeration<T> {
    /// Create from any compatible iterator.
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<T, FsError>> + Send + 'static,
    {
        Self(Box::new(iter))
    }

    /// Create from a pre-collected vector.
    pub fn from_vec(items: Vec<Result<T, FsError>>) -> Self
    where
        T: Send,
    {
        Self(Box::new(items.into_iter()))
    }

    /// Collect all items, short-circuiting on the first error.
    pub fn collect_all(self) -> Result<Vec<T>, FsError> {
        self.collect()
    }
}

impl<T> Iterator for Enumeration<T> {
    type Item = Result<T, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<T> std::fmt::Debug for Enumeration<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enumeration").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryType;

    #[test]
    fn enumeration_from_vec() {
        let items = vec![
            Ok(Entry::new("/a", EntryType::File)),
            Ok(Entry::new("/b", EntryType::Directory)),
        ];
        let collected: Vec<_> = Enumeration::from_vec(items).collect();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn enumeration_collect_all_error() {
        let items: Vec<Result<PathBuf, FsError>> = vec![
            Ok(PathBuf::from("/a")),
            Err(FsError::NotFound {
                path: PathBuf::from("/b"),
            }),
        ];
        assert!(Enumeration::from_vec(items).collect_all().is_err());
    }

    #[test]
    fn enumeration_is_single_pass() {
        let mut listing = Enumeration::new(vec![Ok(PathBuf::from("/a"))].into_iter());
        assert!(listing.next().is_some());
        assert!(listing.next().is_none());
    }

    #[test]
    fn enumeration_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Enumeration<PathBuf>>();
        assert_send::<Enumeration<Entry>>();
    }

    #[test]
    fn fs_dir_is_object_safe() {
        fn _check(_: &dyn FsDir) {}
    }
}
