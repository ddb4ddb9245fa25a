//! # Derived Operations
//!
//! Behavior built purely from the [`Operator`] primitives.
//!
//! ## Overview
//!
//! [`OperatorExt`] is blanket-implemented for every `Operator` (including
//! `dyn Operator`), so a new backend gets these methods without writing any
//! code. The methods only call contract-level operations and never reach into
//! a backend.
//!
//! ## File-or-Directory Switch
//!
//! Generic operations probe `exists_file` first and fall back to the
//! directory branch when it answers `false`. A missing path therefore takes the
//! directory branch, which is what makes `delete` idempotent and `exists`
//! answer `false`.
//!
//! | Method | File branch | Directory branch |
//! |--------|-------------|------------------|
//! | [`exists`](OperatorExt::exists) | `true` | `exists_directory` |
//! | [`delete`](OperatorExt::delete) | `delete_file` | `delete_directory(recursive)` |
//! | [`copy`](OperatorExt::copy) | `copy_file` | `copy_directory` |
//! | [`move_entry`](OperatorExt::move_entry) | `move_file` | `move_directory` |
//! | [`last_modified_utc`](OperatorExt::last_modified_utc) | `file_last_modified_utc` | `directory_last_modified_utc` |
//!
//! No method retries; a failure from the dispatched primitive propagates
//! unchanged.
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, [`OperatorExtJson`] adds `read_json` and
//! `write_json`.

use std::fmt;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local, Utc};
use tracing::debug;

use crate::{FsError, Operator};

/// Extension methods for any operator.
///
/// # Example
///
/// ```rust
/// use site_fs::{FsError, MemoryOperator, OperatorExt};
/// use std::path::Path;
///
/// let op = MemoryOperator::new();
/// op.create_directory_if_missing(Path::new("/data"))?;
/// op.create_directory_if_missing(Path::new("/data"))?;
/// assert!(op.exists(Path::new("/data"))?);
///
/// op.delete(Path::new("/data"))?;
/// op.delete(Path::new("/data"))?;
/// assert!(!op.exists(Path::new("/data"))?);
/// # Ok::<(), FsError>(())
/// ```
pub trait OperatorExt: Operator {
    /// Run `file` if `path` is an existing file, otherwise run `directory`.
    ///
    /// Exactly one `exists_file` probe is made.
    fn file_or_directory_switch<T, F, D>(
        &self,
        path: &Path,
        file: F,
        directory: D,
    ) -> Result<T, FsError>
    where
        F: FnOnce() -> Result<T, FsError>,
        D: FnOnce() -> Result<T, FsError>,
    {
        if self.exists_file(path)? {
            file()
        } else {
            directory()
        }
    }

    /// Returns `true` if `path` exists as a file or a directory.
    ///
    /// Probes `exists_file` first and only asks `exists_directory` when that
    /// answers `false`.
    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        self.file_or_directory_switch(path, || Ok(true), || self.exists_directory(path))
    }

    /// Alias of [`exists_file`](crate::FsEntry::exists_file).
    fn is_existing_file(&self, path: &Path) -> Result<bool, FsError> {
        self.exists_file(path)
    }

    /// Alias of [`exists_directory`](crate::FsEntry::exists_directory).
    fn is_existing_directory(&self, path: &Path) -> Result<bool, FsError> {
        self.exists_directory(path)
    }

    /// Alias of [`exists_file`](crate::FsEntry::exists_file).
    fn is_file(&self, path: &Path) -> Result<bool, FsError> {
        self.exists_file(path)
    }

    /// Alias of [`exists_directory`](crate::FsEntry::exists_directory).
    fn is_directory(&self, path: &Path) -> Result<bool, FsError> {
        self.exists_directory(path)
    }

    /// Create a directory unless it already exists.
    ///
    /// Relies on [`create_directory`](crate::FsDir::create_directory) being
    /// idempotent; no pre-check is made.
    fn create_directory_if_missing(&self, path: &Path) -> Result<(), FsError> {
        self.create_directory(path)
    }

    /// Delete a file if it is present. Same as
    /// [`delete_file`](crate::FsFile::delete_file), which is idempotent.
    fn delete_file_if_present(&self, path: &Path) -> Result<(), FsError> {
        self.delete_file(path)
    }

    /// Delete a directory if it is present. Same as
    /// [`delete_directory`](crate::FsDir::delete_directory), which is
    /// idempotent.
    fn delete_directory_if_present(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        self.delete_directory(path, recursive)
    }

    /// Delete whatever is at `path`; directories are removed recursively.
    fn delete(&self, path: &Path) -> Result<(), FsError> {
        self.file_or_directory_switch(
            path,
            || self.delete_file(path),
            || self.delete_directory(path, true),
        )
    }

    /// Last-modified time of a file or directory, in UTC.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if nothing exists at `path`
    fn last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError> {
        self.file_or_directory_switch(
            path,
            || self.file_last_modified_utc(path),
            || self.directory_last_modified_utc(path),
        )
    }

    /// Last-modified time of a file or directory, in the local time zone.
    fn last_modified(&self, path: &Path) -> Result<DateTime<Local>, FsError> {
        Ok(self.last_modified_utc(path)?.with_timezone(&Local))
    }

    /// Last-modified time of a file, in the local time zone.
    fn file_last_modified(&self, path: &Path) -> Result<DateTime<Local>, FsError> {
        Ok(self.file_last_modified_utc(path)?.with_timezone(&Local))
    }

    /// Last-modified time of a directory, in the local time zone.
    fn directory_last_modified(&self, path: &Path) -> Result<DateTime<Local>, FsError> {
        Ok(self.directory_last_modified_utc(path)?.with_timezone(&Local))
    }

    /// Copy a file or directory within this backend.
    ///
    /// `overwrite` only applies to files; directory copies always overwrite
    /// conflicting files.
    fn copy(&self, source: &Path, destination: &Path, overwrite: bool) -> Result<(), FsError> {
        self.file_or_directory_switch(
            source,
            || self.copy_file(source, destination, overwrite),
            || self.copy_directory(source, destination),
        )
    }

    /// Move a file or directory within this backend.
    ///
    /// `overwrite` only applies to files.
    fn move_entry(
        &self,
        source: &Path,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), FsError> {
        self.file_or_directory_switch(
            source,
            || self.move_file(source, destination, overwrite),
            || self.move_directory(source, destination),
        )
    }

    /// Alias of [`copy_stream_in`](crate::FsStream::copy_stream_in).
    fn copy_to(
        &self,
        source: &mut dyn std::io::Read,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), FsError> {
        self.copy_stream_in(source, destination, overwrite)
    }

    /// Alias of [`copy_stream_out`](crate::FsStream::copy_stream_out).
    fn copy_from(&self, source: &Path, destination: &mut dyn Write) -> Result<(), FsError> {
        self.copy_stream_out(source, destination)
    }

    /// Copy a file from this operator to another one.
    ///
    /// Method form of [`copy_across_operators`].
    fn copy_to_operator<D>(
        &self,
        source: &Path,
        destination_operator: &D,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), FsError>
    where
        D: Operator + ?Sized,
    {
        copy_across_operators(self, source, destination_operator, destination, overwrite)
    }

    /// Create a file and wrap its stream in a UTF-8 [`TextWriter`].
    fn create_text_writer(&self, path: &Path, overwrite: bool) -> Result<TextWriter, FsError> {
        let stream = self.create_file(path, overwrite)?;
        Ok(TextWriter::new(path, stream))
    }
}

// Blanket implementation - any Operator gets OperatorExt for free
impl<O: Operator + ?Sized> OperatorExt for O {}

/// Copy a file between two independent operators.
///
/// Opens a reader on `source_operator` and hands it to
/// `destination_operator.copy_stream_in`. The reader is dropped on every exit
/// path, including failure. The source entry is left untouched.
///
/// ```rust
/// use site_fs::{copy_across_operators, FsEntry, FsError, FsFile, MemoryOperator};
/// use std::io::Write;
/// use std::path::Path;
///
/// let a = MemoryOperator::new();
/// let b = MemoryOperator::new();
/// a.create_file(Path::new("/x"), true)?.write_all(b"payload")?;
///
/// copy_across_operators(&a, Path::new("/x"), &b, Path::new("/y"), true)?;
/// assert!(b.exists_file(Path::new("/y"))?);
/// assert!(a.exists_file(Path::new("/x"))?);
/// # Ok::<(), FsError>(())
/// ```
pub fn copy_across_operators<S, D>(
    source_operator: &S,
    source: &Path,
    destination_operator: &D,
    destination: &Path,
    overwrite: bool,
) -> Result<(), FsError>
where
    S: Operator + ?Sized,
    D: Operator + ?Sized,
{
    debug!(
        source = %source.display(),
        destination = %destination.display(),
        overwrite,
        "copying across operators"
    );
    let mut reader = source_operator.read_file(source)?;
    destination_operator.copy_stream_in(&mut reader, destination, overwrite)
}

/// UTF-8 text writer over a backend stream.
///
/// Owns the stream returned by `create_file`. [`close`](TextWriter::close)
/// flushes and releases it; dropping without closing releases it too but
/// discards any flush error.
pub struct TextWriter {
    path: std::path::PathBuf,
    inner: Option<BufWriter<Box<dyn Write + Send>>>,
}

impl TextWriter {
    fn new(path: &Path, stream: Box<dyn Write + Send>) -> Self {
        Self {
            path: path.to_path_buf(),
            inner: Some(BufWriter::new(stream)),
        }
    }

    /// Write a string.
    pub fn write_str(&mut self, text: &str) -> Result<(), FsError> {
        let Some(writer) = self.inner.as_mut() else {
            return Err(self.closed_error());
        };
        writer
            .write_all(text.as_bytes())
            .map_err(FsError::io("write_text", &self.path))
    }

    /// Write a string followed by `\n`.
    pub fn write_line(&mut self, line: &str) -> Result<(), FsError> {
        self.write_str(line)?;
        self.write_str("\n")
    }

    /// Flush buffered text and close the underlying stream.
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), FsError> {
        let Some(mut writer) = self.inner.take() else {
            return Ok(());
        };
        writer.flush().map_err(FsError::io("close_text", &self.path))?;
        let mut stream = writer
            .into_inner()
            .map_err(|e| FsError::io("close_text", &self.path)(e.into_error()))?;
        stream.flush().map_err(FsError::io("close_text", &self.path))
    }

    /// Returns `true` once [`close`](TextWriter::close) has run.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    fn closed_error(&self) -> FsError {
        FsError::Io {
            operation: "write_text",
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "text writer is closed"),
        }
    }
}

impl Write for TextWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.inner.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(self.closed_error().into()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.inner.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl fmt::Write for TextWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        TextWriter::write_str(self, s).map_err(|_| fmt::Error)
    }
}

impl fmt::Debug for TextWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextWriter")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

// =============================================================================
// JSON Support (Feature-Gated)
// =============================================================================

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::{Serialize, de::DeserializeOwned};

    /// JSON serialization extension methods.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait OperatorExtJson: Operator {
        /// Read a file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::NotFound`: File doesn't exist
        /// - `FsError::Deserialization`: JSON parsing failed
        fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, FsError> {
            let reader = self.read_file(path)?;
            serde_json::from_reader(reader).map_err(|e| FsError::Deserialization(e.to_string()))
        }

        /// Serialize a value and write it as pretty-printed JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::CannotOverwrite`: file exists and `overwrite` is `false`
        /// - `FsError::Serialization`: JSON serialization failed
        fn write_json<T: Serialize>(
            &self,
            path: &Path,
            value: &T,
            overwrite: bool,
        ) -> Result<(), FsError> {
            let json = serde_json::to_vec_pretty(value)
                .map_err(|e| FsError::Serialization(e.to_string()))?;
            let mut writer = self.create_file(path, overwrite)?;
            writer
                .write_all(&json)
                .and_then(|()| writer.flush())
                .map_err(FsError::io("write_json", path))
        }
    }

    // Blanket implementation
    impl<O: Operator + ?Sized> OperatorExtJson for O {}
}

#[cfg(feature = "serde")]
pub use json::OperatorExtJson;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Entry, EntryType, Enumeration, FileStream, FsDir, FsEntry, FsFile, FsPermissions,
        FsStream, Mode,
    };
    use std::io::Read;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records every primitive call; answers from fixed flags.
    struct RecordingFs {
        file_exists: bool,
        dir_exists: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingFs {
        fn with_file() -> Self {
            Self::new(true, false)
        }

        fn with_dir() -> Self {
            Self::new(false, true)
        }

        fn empty() -> Self {
            Self::new(false, false)
        }

        fn new(file_exists: bool, dir_exists: bool) -> Self {
            Self {
                file_exists,
                dir_exists,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn when() -> DateTime<Utc> {
            DateTime::from_timestamp(1_700_000_000, 0).unwrap()
        }
    }

    impl FsEntry for RecordingFs {
        fn exists_file(&self, _: &Path) -> Result<bool, FsError> {
            self.record("exists_file");
            Ok(self.file_exists)
        }

        fn exists_directory(&self, _: &Path) -> Result<bool, FsError> {
            self.record("exists_directory");
            Ok(self.dir_exists)
        }

        fn entry_type(&self, path: &Path) -> Result<EntryType, FsError> {
            self.record("entry_type");
            match (self.file_exists, self.dir_exists) {
                (true, _) => Ok(EntryType::File),
                (_, true) => Ok(EntryType::Directory),
                _ => Err(FsError::NotFound {
                    path: path.to_path_buf(),
                }),
            }
        }
    }

    impl FsFile for RecordingFs {
        fn delete_file(&self, _: &Path) -> Result<(), FsError> {
            self.record("delete_file");
            Ok(())
        }

        fn create_file(
            &self,
            path: &Path,
            overwrite: bool,
        ) -> Result<Box<dyn Write + Send>, FsError> {
            self.record("create_file");
            if self.file_exists && !overwrite {
                return Err(self.cannot_overwrite_error(path));
            }
            Ok(Box::new(std::io::sink()))
        }

        fn open_file(&self, _: &Path) -> Result<Box<dyn FileStream>, FsError> {
            self.record("open_file");
            Ok(Box::new(std::io::Cursor::new(Vec::new())))
        }

        fn read_file(&self, _: &Path) -> Result<Box<dyn Read + Send>, FsError> {
            self.record("read_file");
            Ok(Box::new(std::io::Cursor::new(b"recorded".to_vec())))
        }

        fn file_last_modified_utc(&self, _: &Path) -> Result<DateTime<Utc>, FsError> {
            self.record("file_last_modified_utc");
            Ok(Self::when())
        }

        fn copy_file(&self, _: &Path, _: &Path, _: bool) -> Result<(), FsError> {
            self.record("copy_file");
            Ok(())
        }

        fn move_file(&self, _: &Path, _: &Path, _: bool) -> Result<(), FsError> {
            self.record("move_file");
            Ok(())
        }
    }

    impl FsDir for RecordingFs {
        fn delete_directory(&self, _: &Path, _: bool) -> Result<(), FsError> {
            self.record("delete_directory");
            Ok(())
        }

        fn create_directory(&self, _: &Path) -> Result<(), FsError> {
            self.record("create_directory");
            Ok(())
        }

        fn enumerate_entry_paths(
            &self,
            _: &Path,
            _: bool,
        ) -> Result<Enumeration<PathBuf>, FsError> {
            Ok(Enumeration::from_vec(vec![]))
        }

        fn enumerate_directories(&self, _: &Path) -> Result<Enumeration<PathBuf>, FsError> {
            Ok(Enumeration::from_vec(vec![]))
        }

        fn enumerate_files(&self, _: &Path) -> Result<Enumeration<PathBuf>, FsError> {
            Ok(Enumeration::from_vec(vec![]))
        }

        fn enumerate_entries(&self, _: &Path, _: bool) -> Result<Enumeration<Entry>, FsError> {
            Ok(Enumeration::from_vec(vec![]))
        }

        fn directory_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError> {
            self.record("directory_last_modified_utc");
            if self.dir_exists {
                Ok(Self::when())
            } else {
                Err(FsError::NotFound {
                    path: path.to_path_buf(),
                })
            }
        }

        fn copy_directory(&self, _: &Path, _: &Path) -> Result<(), FsError> {
            self.record("copy_directory");
            Ok(())
        }

        fn move_directory(&self, _: &Path, _: &Path) -> Result<(), FsError> {
            self.record("move_directory");
            Ok(())
        }
    }

    impl FsStream for RecordingFs {
        fn copy_stream_in(
            &self,
            source: &mut dyn Read,
            path: &Path,
            overwrite: bool,
        ) -> Result<(), FsError> {
            self.record("copy_stream_in");
            if self.file_exists && !overwrite {
                return Err(self.cannot_overwrite_error(path));
            }
            std::io::copy(source, &mut std::io::sink())?;
            Ok(())
        }

        fn copy_stream_out(&self, _: &Path, destination: &mut dyn Write) -> Result<(), FsError> {
            self.record("copy_stream_out");
            destination.write_all(b"recorded")?;
            Ok(())
        }
    }

    impl FsPermissions for RecordingFs {
        fn change_permissions(&self, _: &Path, _: Mode) -> Result<(), FsError> {
            self.record("change_permissions");
            Ok(())
        }
    }

    #[test]
    fn exists_short_circuits_on_file() {
        let fs = RecordingFs::with_file();
        assert!(fs.exists(Path::new("/a.txt")).unwrap());
        assert_eq!(fs.calls(), vec!["exists_file"]);
    }

    #[test]
    fn exists_falls_back_to_directory() {
        let fs = RecordingFs::with_dir();
        assert!(fs.exists(Path::new("/dir")).unwrap());
        assert_eq!(fs.calls(), vec!["exists_file", "exists_directory"]);
    }

    #[test]
    fn exists_false_for_missing() {
        let fs = RecordingFs::empty();
        assert!(!fs.exists(Path::new("/missing")).unwrap());
    }

    #[test]
    fn aliases_forward_without_extra_checks() {
        let fs = RecordingFs::with_file();
        assert!(fs.is_file(Path::new("/a")).unwrap());
        assert!(fs.is_existing_file(Path::new("/a")).unwrap());
        assert!(!fs.is_directory(Path::new("/a")).unwrap());
        assert!(!fs.is_existing_directory(Path::new("/a")).unwrap());
        assert_eq!(
            fs.calls(),
            vec!["exists_file", "exists_file", "exists_directory", "exists_directory"]
        );
    }

    #[test]
    fn create_directory_if_missing_makes_no_pre_check() {
        let fs = RecordingFs::with_dir();
        fs.create_directory_if_missing(Path::new("/dir")).unwrap();
        assert_eq!(fs.calls(), vec!["create_directory"]);
    }

    #[test]
    fn delete_dispatches_on_entry_kind() {
        let file = RecordingFs::with_file();
        file.delete(Path::new("/a")).unwrap();
        assert_eq!(file.calls(), vec!["exists_file", "delete_file"]);

        let dir = RecordingFs::with_dir();
        dir.delete(Path::new("/d")).unwrap();
        assert_eq!(dir.calls(), vec!["exists_file", "delete_directory"]);
    }

    #[test]
    fn delete_missing_takes_directory_branch() {
        let fs = RecordingFs::empty();
        fs.delete(Path::new("/missing")).unwrap();
        assert_eq!(fs.calls(), vec!["exists_file", "delete_directory"]);
    }

    #[test]
    fn copy_and_move_dispatch() {
        let file = RecordingFs::with_file();
        file.copy(Path::new("/a"), Path::new("/b"), false).unwrap();
        file.move_entry(Path::new("/a"), Path::new("/b"), true).unwrap();
        assert_eq!(
            file.calls(),
            vec!["exists_file", "copy_file", "exists_file", "move_file"]
        );

        let dir = RecordingFs::with_dir();
        dir.copy(Path::new("/d"), Path::new("/e"), false).unwrap();
        dir.move_entry(Path::new("/d"), Path::new("/e"), false).unwrap();
        assert_eq!(
            dir.calls(),
            vec!["exists_file", "copy_directory", "exists_file", "move_directory"]
        );
    }

    #[test]
    fn last_modified_dispatch_and_local_conversion() {
        let file = RecordingFs::with_file();
        let utc = file.last_modified_utc(Path::new("/a")).unwrap();
        assert_eq!(utc, RecordingFs::when());
        let local = file.last_modified(Path::new("/a")).unwrap();
        assert_eq!(local.with_timezone(&Utc), utc);

        let dir = RecordingFs::with_dir();
        assert_eq!(
            dir.directory_last_modified(Path::new("/d"))
                .unwrap()
                .timestamp(),
            utc.timestamp()
        );
        assert!(dir.calls().contains(&"directory_last_modified_utc"));
    }

    #[test]
    fn last_modified_missing_propagates_not_found() {
        let fs = RecordingFs::empty();
        let err = fs.last_modified_utc(Path::new("/missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn copy_to_and_copy_from_alias_stream_primitives() {
        let fs = RecordingFs::empty();
        let mut input = std::io::Cursor::new(b"data".to_vec());
        fs.copy_to(&mut input, Path::new("/x"), false).unwrap();
        let mut out = Vec::new();
        fs.copy_from(Path::new("/x"), &mut out).unwrap();
        assert_eq!(out, b"recorded");
        assert_eq!(fs.calls(), vec!["copy_stream_in", "copy_stream_out"]);
    }

    #[test]
    fn copy_across_reads_source_and_streams_in() {
        let source = RecordingFs::with_file();
        let destination = RecordingFs::empty();
        copy_across_operators(&source, Path::new("/x"), &destination, Path::new("/y"), true)
            .unwrap();
        assert_eq!(source.calls(), vec!["read_file"]);
        assert_eq!(destination.calls(), vec!["copy_stream_in"]);
    }

    #[test]
    fn copy_across_propagates_cannot_overwrite() {
        let source = RecordingFs::with_file();
        let destination = RecordingFs::with_file();
        let err = source
            .copy_to_operator(Path::new("/x"), &destination, Path::new("/y"), false)
            .unwrap_err();
        assert!(err.is_cannot_overwrite());
    }

    #[test]
    fn text_writer_close_is_single_shot() {
        let fs = RecordingFs::empty();
        let mut writer = fs.create_text_writer(Path::new("/t.txt"), true).unwrap();
        writer.write_line("hello").unwrap();
        assert!(!writer.is_closed());
        writer.close().unwrap();
        assert!(writer.is_closed());
        writer.close().unwrap();
        assert!(writer.write_str("late").is_err());
    }

    #[test]
    fn text_writer_refuses_overwrite() {
        let fs = RecordingFs::with_file();
        let err = fs.create_text_writer(Path::new("/t.txt"), false).unwrap_err();
        assert!(err.is_cannot_overwrite());
    }

    #[test]
    fn operator_ext_available_on_dyn_operator() {
        let fs: &dyn Operator = &RecordingFs::with_file();
        assert!(fs.exists(Path::new("/a")).unwrap());
    }
}
