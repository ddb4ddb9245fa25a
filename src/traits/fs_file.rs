//! File operations.

use std::io::{Read, Seek, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::FsError;

/// A stream that can be read, written and repositioned.
///
/// Returned by [`FsFile::open_file`]. Blanket-implemented for every
/// `Read + Write + Seek + Send` type.
pub trait FileStream: Read + Write + Seek + Send {}

impl<T: Read + Write + Seek + Send> FileStream for T {}

/// File operations for a storage backend.
///
/// Streams handed out by this trait are exclusively owned by the caller.
/// Dropping a stream closes it; writers should be flushed first so write
/// failures are observed.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access. Two concurrent `create_file` calls on the same path race
/// and the winner is undefined.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsFile`.
pub trait FsFile: Send + Sync {
    /// Delete a file.
    ///
    /// Idempotent: an absent file is a successful no-op.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotAFile`] if the path is a directory
    fn delete_file(&self, path: &Path) -> Result<(), FsError>;

    /// Create (or truncate) a file and return a writer for it.
    ///
    /// # Errors
    ///
    /// - [`FsError::CannotOverwrite`] if the file exists and `overwrite` is
    ///   `false`; the existing content is left unchanged
    /// - [`FsError::NotFound`] if the parent directory does not exist
    fn create_file(&self, path: &Path, overwrite: bool) -> Result<Box<dyn Write + Send>, FsError>;

    /// Open an existing file for reading and writing.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file does not exist
    fn open_file(&self, path: &Path) -> Result<Box<dyn FileStream>, FsError>;

    /// Open an existing file for reading.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file does not exist
    fn read_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError>;

    /// Last-modified time of a file, in UTC.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file does not exist
    fn file_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError>;

    /// Copy a file within this backend.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the source does not exist
    /// - [`FsError::CannotOverwrite`] if the destination exists and
    ///   `overwrite` is `false`
    fn copy_file(&self, source: &Path, destination: &Path, overwrite: bool)
    -> Result<(), FsError>;

    /// Move a file within this backend.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the source does not exist
    /// - [`FsError::CannotOverwrite`] if the destination exists and
    ///   `overwrite` is `false`
    fn move_file(&self, source: &Path, destination: &Path, overwrite: bool)
    -> Result<(), FsError>;
}
