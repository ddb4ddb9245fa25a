//! Core value types: entry descriptors and permission modes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Classification of a file-system entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl EntryType {
    /// Returns `true` for [`EntryType::File`].
    #[inline]
    pub fn is_file(self) -> bool {
        self == EntryType::File
    }

    /// Returns `true` for [`EntryType::Directory`].
    #[inline]
    pub fn is_directory(self) -> bool {
        self == EntryType::Directory
    }
}

/// Snapshot descriptor of one file-system item.
///
/// Produced by enumeration and lookup calls. The type reflects the entry at the
/// moment the descriptor was built; it is not a live view and holds no backing
/// resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    path: PathBuf,
    entry_type: EntryType,
    last_modified_utc: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create a descriptor without a timestamp.
    pub fn new(path: impl Into<PathBuf>, entry_type: EntryType) -> Self {
        Self {
            path: path.into(),
            entry_type,
            last_modified_utc: None,
        }
    }

    /// Create a descriptor carrying the last-modified time.
    pub fn with_last_modified(
        path: impl Into<PathBuf>,
        entry_type: EntryType,
        last_modified_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            entry_type,
            last_modified_utc: Some(last_modified_utc),
        }
    }

    /// Path of the entry, in whatever form the producing backend uses.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry classification.
    #[inline]
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Last-modified time, when the backend supplied one.
    #[inline]
    pub fn last_modified_utc(&self) -> Option<DateTime<Utc>> {
        self.last_modified_utc
    }

    /// Returns `true` if this entry is a file.
    #[inline]
    pub fn is_file(&self) -> bool {
        self.entry_type.is_file()
    }

    /// Returns `true` if this entry is a directory.
    #[inline]
    pub fn is_directory(&self) -> bool {
        self.entry_type.is_directory()
    }

    /// Consume the descriptor, returning its path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Opaque permission bit pattern handed to
/// [`FsPermissions::change_permissions`](crate::FsPermissions::change_permissions).
///
/// The meaning is backend-specific. Local disk on Unix treats it as POSIX
/// mode bits (e.g. `0o644`). No bits are masked off here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mode(u32);

impl Mode {
    /// Wrap a raw bit pattern.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bit pattern.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if no write bits (user, group or other) are set.
    #[inline]
    pub const fn readonly(&self) -> bool {
        (self.0 & 0o222) == 0
    }
}

impl From<u32> for Mode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn entry_type_predicates() {
        assert!(EntryType::File.is_file());
        assert!(!EntryType::File.is_directory());
        assert!(EntryType::Directory.is_directory());
        assert_ne!(EntryType::File, EntryType::Directory);
    }

    #[test]
    fn entry_without_timestamp() {
        let e = Entry::new("/root/a.txt", EntryType::File);
        assert_eq!(e.path(), Path::new("/root/a.txt"));
        assert!(e.is_file());
        assert!(e.last_modified_utc().is_none());
    }

    #[test]
    fn entry_with_timestamp() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let e = Entry::with_last_modified("/root/sub", EntryType::Directory, when);
        assert!(e.is_directory());
        assert_eq!(e.last_modified_utc(), Some(when));
        assert_eq!(e.into_path(), PathBuf::from("/root/sub"));
    }

    #[test]
    fn mode_keeps_all_bits() {
        let m = Mode::from_bits(0o104755);
        assert_eq!(m.bits(), 0o104755);
    }

    #[test]
    fn mode_readonly() {
        assert!(Mode::from(0o444).readonly());
        assert!(!Mode::from(0o644).readonly());
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EntryType>();
        assert_send_sync::<Entry>();
        assert_send_sync::<Mode>();
    }
}
