//! Local disk backend over `std::fs`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    Entry, EntryType, Enumeration, FileStream, FsDir, FsEntry, FsError, FsFile, FsPermissions,
    FsStream, Mode,
};

/// Backend for the machine's own file system.
///
/// Paths are handed to the OS unchanged; relative paths resolve against the
/// process working directory. Symbolic links are followed when classifying an
/// entry and never reported as a separate type.
///
/// ## Enumeration
///
/// Enumeration is lazy and reads the OS directory stream as it goes. Entries
/// created or removed while iterating may or may not appear. An entry that
/// disappears between being listed and being classified is reported as an
/// `Err` item rather than silently dropped.
///
/// ## Permissions
///
/// On Unix the [`Mode`] bits are applied as POSIX permission bits. On other
/// platforms only the write bits are honoured: a mode with no write bits makes
/// the entry read-only, any other mode clears the read-only flag.
///
/// ## Moves
///
/// Moves use `rename`. When source and destination live on different devices
/// the data is copied and the source removed afterwards.
///
/// ## Copies
///
/// Copying an entry onto itself leaves it untouched. A stream copy that
/// replaces an existing file is staged in a sibling temporary file and renamed
/// into place, keeping the old file's permissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOperator;

impl LocalOperator {
    /// Create a local disk operator.
    pub fn new() -> Self {
        Self
    }
}

/// Metadata for `path`, or `None` if nothing is there.
fn probe(path: &Path) -> Result<Option<fs::Metadata>, FsError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(e) => Err(FsError::io("metadata", path)(e)),
    }
}

fn require_file(path: &Path) -> Result<fs::Metadata, FsError> {
    match probe(path)? {
        Some(meta) if meta.is_file() => Ok(meta),
        Some(_) => Err(FsError::NotAFile {
            path: path.to_path_buf(),
        }),
        None => Err(FsError::NotFound {
            path: path.to_path_buf(),
        }),
    }
}

fn require_directory(path: &Path) -> Result<fs::Metadata, FsError> {
    match probe(path)? {
        Some(meta) if meta.is_dir() => Ok(meta),
        Some(_) => Err(FsError::NotADirectory {
            path: path.to_path_buf(),
        }),
        None => Err(FsError::NotFound {
            path: path.to_path_buf(),
        }),
    }
}

fn canonical(path: &Path) -> Result<Option<PathBuf>, FsError> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(Some(resolved)),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(e) => Err(FsError::io("canonicalize", path)(e)),
    }
}

/// Returns `true` if both paths resolve to the same existing entry.
fn same_entry(a: &Path, b: &Path) -> Result<bool, FsError> {
    Ok(match (canonical(a)?, canonical(b)?) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    })
}

/// Replace an existing file through a sibling temporary file.
///
/// `destination` stays intact until the final rename, so `source` may be a
/// reader on the destination itself. The existing permissions are kept.
fn replace_from(
    source: &mut dyn Read,
    destination: &Path,
    existing: &fs::Metadata,
) -> Result<u64, FsError> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut staged =
        NamedTempFile::new_in(parent).map_err(FsError::io("copy_stream_in", destination))?;
    let copied = io::copy(source, &mut staged)
        .and_then(|n| staged.flush().map(|()| n))
        .map_err(FsError::io("copy_stream_in", destination))?;
    fs::set_permissions(staged.path(), existing.permissions())
        .map_err(FsError::io("copy_stream_in", destination))?;
    staged
        .persist(destination)
        .map_err(|e| FsError::io("copy_stream_in", destination)(e.error))?;
    Ok(copied)
}

fn modified_utc(meta: &fs::Metadata, path: &Path) -> Result<DateTime<Utc>, FsError> {
    meta.modified()
        .map(DateTime::<Utc>::from)
        .map_err(FsError::io("modified", path))
}

fn walk_error(err: walkdir::Error) -> FsError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    match err.into_io_error() {
        Some(source) => FsError::io("enumerate", &path)(source),
        None => FsError::Backend(format!("file system loop at {}", path.display())),
    }
}

/// Classify a walked entry, following symbolic links.
fn classify(entry: &walkdir::DirEntry) -> Result<EntryType, FsError> {
    let file_type = entry.file_type();
    let is_dir = if file_type.is_symlink() {
        fs::metadata(entry.path())
            .map_err(FsError::io("enumerate", entry.path()))?
            .is_dir()
    } else {
        file_type.is_dir()
    };
    Ok(if is_dir {
        EntryType::Directory
    } else {
        EntryType::File
    })
}

/// Lazy walk below `path`, excluding `path` itself.
fn walk(
    path: &Path,
    recursive: bool,
) -> Result<impl Iterator<Item = Result<walkdir::DirEntry, FsError>> + Send + 'static, FsError> {
    require_directory(path)?;
    let max_depth = if recursive { usize::MAX } else { 1 };
    Ok(WalkDir::new(path)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .map(|entry| entry.map_err(walk_error)))
}

fn walk_typed(path: &Path, wanted: EntryType) -> Result<Enumeration<PathBuf>, FsError> {
    let iter = walk(path, false)?.filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => return Some(Err(e)),
        };
        match classify(&entry) {
            Ok(kind) if kind == wanted => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        }
    });
    Ok(Enumeration::new(iter))
}

/// Rename, falling back to copy-then-delete across devices.
fn rename_or_relocate(
    source: &Path,
    destination: &Path,
    relocate: impl FnOnce() -> Result<(), FsError>,
) -> Result<(), FsError> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                source = %source.display(),
                destination = %destination.display(),
                "rename crosses devices, copying instead"
            );
            relocate()
        }
        Err(e) => Err(FsError::io("rename", source)(e)),
    }
}

impl FsEntry for LocalOperator {
    fn exists_file(&self, path: &Path) -> Result<bool, FsError> {
        Ok(probe(path)?.is_some_and(|meta| meta.is_file()))
    }

    fn exists_directory(&self, path: &Path) -> Result<bool, FsError> {
        Ok(probe(path)?.is_some_and(|meta| meta.is_dir()))
    }

    fn entry_type(&self, path: &Path) -> Result<EntryType, FsError> {
        match probe(path)? {
            Some(meta) if meta.is_dir() => Ok(EntryType::Directory),
            Some(_) => Ok(EntryType::File),
            None => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl FsFile for LocalOperator {
    fn delete_file(&self, path: &Path) -> Result<(), FsError> {
        match probe(path)? {
            None => return Ok(()),
            Some(meta) if meta.is_dir() => {
                return Err(FsError::NotAFile {
                    path: path.to_path_buf(),
                });
            }
            Some(_) => {}
        }
        debug!(path = %path.display(), "deleting file");
        match fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other.map_err(FsError::io("delete_file", path)),
        }
    }

    fn create_file(&self, path: &Path, overwrite: bool) -> Result<Box<dyn Write + Send>, FsError> {
        if self.exists_directory(path)? {
            return Err(FsError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), overwrite, "creating file");
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        match options.open(path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(self.cannot_overwrite_error(path))
            }
            Err(e) => Err(FsError::io("create_file", path)(e)),
        }
    }

    fn open_file(&self, path: &Path) -> Result<Box<dyn FileStream>, FsError> {
        require_file(path)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(FsError::io("open_file", path))?;
        Ok(Box::new(file))
    }

    fn read_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError> {
        require_file(path)?;
        let file = File::open(path).map_err(FsError::io("read_file", path))?;
        Ok(Box::new(file))
    }

    fn file_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError> {
        modified_utc(&require_file(path)?, path)
    }

    fn copy_file(&self, source: &Path, destination: &Path, overwrite: bool) -> Result<(), FsError> {
        require_file(source)?;
        match probe(destination)? {
            Some(meta) if meta.is_dir() => {
                return Err(FsError::NotAFile {
                    path: destination.to_path_buf(),
                });
            }
            Some(_) if !overwrite => return Err(self.cannot_overwrite_error(destination)),
            Some(_) if same_entry(source, destination)? => return Ok(()),
            _ => {}
        }
        debug!(source = %source.display(), destination = %destination.display(), "copying file");
        fs::copy(source, destination).map_err(FsError::io("copy_file", destination))?;
        Ok(())
    }

    fn move_file(&self, source: &Path, destination: &Path, overwrite: bool) -> Result<(), FsError> {
        require_file(source)?;
        match probe(destination)? {
            Some(meta) if meta.is_dir() => {
                return Err(FsError::NotAFile {
                    path: destination.to_path_buf(),
                });
            }
            Some(_) if !overwrite => return Err(self.cannot_overwrite_error(destination)),
            _ => {}
        }
        debug!(source = %source.display(), destination = %destination.display(), "moving file");
        rename_or_relocate(source, destination, || {
            fs::copy(source, destination).map_err(FsError::io("move_file", destination))?;
            fs::remove_file(source).map_err(FsError::io("move_file", source))
        })
    }
}

impl FsDir for LocalOperator {
    fn delete_directory(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        match probe(path)? {
            None => return Ok(()),
            Some(meta) if !meta.is_dir() => {
                return Err(FsError::NotADirectory {
                    path: path.to_path_buf(),
                });
            }
            Some(_) => {}
        }
        debug!(path = %path.display(), recursive, "deleting directory");
        let result = if recursive {
            fs::remove_dir_all(path)
        } else {
            let mut children = fs::read_dir(path).map_err(FsError::io("delete_directory", path))?;
            if children.next().is_some() {
                return Err(FsError::DirectoryNotEmpty {
                    path: path.to_path_buf(),
                });
            }
            fs::remove_dir(path)
        };
        match result {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => {
                Err(FsError::DirectoryNotEmpty {
                    path: path.to_path_buf(),
                })
            }
            other => other.map_err(FsError::io("delete_directory", path)),
        }
    }

    fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        match fs::create_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::NotADirectory
                ) =>
            {
                Err(FsError::NotADirectory {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => Err(FsError::io("create_directory", path)(e)),
        }
    }

    fn enumerate_entry_paths(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Enumeration<PathBuf>, FsError> {
        let iter = walk(path, recursive)?.map(|entry| entry.map(walkdir::DirEntry::into_path));
        Ok(Enumeration::new(iter))
    }

    fn enumerate_directories(&self, path: &Path) -> Result<Enumeration<PathBuf>, FsError> {
        walk_typed(path, EntryType::Directory)
    }

    fn enumerate_files(&self, path: &Path) -> Result<Enumeration<PathBuf>, FsError> {
        walk_typed(path, EntryType::File)
    }

    fn enumerate_entries(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Enumeration<Entry>, FsError> {
        let iter = walk(path, recursive)?.map(|entry| -> Result<Entry, FsError> {
            let entry = entry?;
            let entry_type = classify(&entry)?;
            let meta = fs::metadata(entry.path()).map_err(FsError::io("enumerate", entry.path()))?;
            let modified = modified_utc(&meta, entry.path())?;
            Ok(Entry::with_last_modified(
                entry.into_path(),
                entry_type,
                modified,
            ))
        });
        Ok(Enumeration::new(iter))
    }

    fn directory_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError> {
        modified_utc(&require_directory(path)?, path)
    }

    fn copy_directory(&self, source: &Path, destination: &Path) -> Result<(), FsError> {
        // Collect first so a destination inside the source is not walked.
        let tree: Vec<(PathBuf, EntryType)> = walk(source, true)?
            .map(|entry| -> Result<(PathBuf, EntryType), FsError> {
                let entry = entry?;
                let entry_type = classify(&entry)?;
                Ok((entry.into_path(), entry_type))
            })
            .collect::<Result<_, FsError>>()?;
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            entries = tree.len(),
            "copying directory"
        );
        self.create_directory(destination)?;
        for (child, entry_type) in tree {
            let Ok(relative) = child.strip_prefix(source) else {
                continue;
            };
            let target = destination.join(relative);
            match entry_type {
                EntryType::Directory => self.create_directory(&target)?,
                EntryType::File => {
                    if self.exists_directory(&target)? {
                        return Err(FsError::NotAFile { path: target });
                    }
                    if same_entry(&child, &target)? {
                        continue;
                    }
                    fs::copy(&child, &target).map_err(FsError::io("copy_directory", &target))?;
                }
            }
        }
        Ok(())
    }

    fn move_directory(&self, source: &Path, destination: &Path) -> Result<(), FsError> {
        require_directory(source)?;
        if probe(destination)?.is_some() {
            return Err(self.cannot_overwrite_error(destination));
        }
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_directory(parent)?;
        }
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            "moving directory"
        );
        rename_or_relocate(source, destination, || {
            self.copy_directory(source, destination)?;
            self.delete_directory(source, true)
        })
    }
}

impl FsStream for LocalOperator {
    fn copy_stream_in(
        &self,
        source: &mut dyn Read,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), FsError> {
        let existing = match probe(destination)? {
            Some(meta) if meta.is_dir() => {
                return Err(FsError::NotAFile {
                    path: destination.to_path_buf(),
                });
            }
            Some(_) if !overwrite => return Err(self.cannot_overwrite_error(destination)),
            existing => existing,
        };
        let copied = match existing {
            Some(meta) => replace_from(source, destination, &meta)?,
            None => {
                let mut writer = self.create_file(destination, overwrite)?;
                io::copy(source, &mut writer)
                    .and_then(|n| writer.flush().map(|()| n))
                    .map_err(FsError::io("copy_stream_in", destination))?
            }
        };
        debug!(destination = %destination.display(), bytes = copied, "stream copied in");
        Ok(())
    }

    fn copy_stream_out(&self, source: &Path, destination: &mut dyn Write) -> Result<(), FsError> {
        let mut reader = self.read_file(source)?;
        io::copy(&mut reader, &mut *destination)
            .and_then(|_| destination.flush())
            .map_err(FsError::io("copy_stream_out", source))
    }
}

impl FsPermissions for LocalOperator {
    fn change_permissions(&self, path: &Path, mode: Mode) -> Result<(), FsError> {
        let meta = probe(path)?.ok_or_else(|| FsError::NotFound {
            path: path.to_path_buf(),
        })?;
        debug!(path = %path.display(), mode = mode.bits(), "changing permissions");
        fs::set_permissions(path, permissions_for(meta, mode))
            .map_err(FsError::io("change_permissions", path))
    }
}

#[cfg(unix)]
fn permissions_for(_meta: fs::Metadata, mode: Mode) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    fs::Permissions::from_mode(mode.bits())
}

#[cfg(not(unix))]
fn permissions_for(meta: fs::Metadata, mode: Mode) -> fs::Permissions {
    let mut permissions = meta.permissions();
    permissions.set_readonly(mode.readonly());
    permissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, data: &[u8]) {
        let mut w = LocalOperator.create_file(path, true).unwrap();
        w.write_all(data).unwrap();
        w.flush().unwrap();
    }

    #[test]
    fn probe_treats_file_component_as_missing() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f");
        write(&file, b"x");
        assert!(probe(&file.join("child")).unwrap().is_none());
        assert!(!LocalOperator.exists_file(&file.join("child")).unwrap());
    }

    #[test]
    fn create_file_without_overwrite_keeps_content() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        write(&file, b"original");
        let err = LocalOperator.create_file(&file, false).err().unwrap();
        assert!(err.is_cannot_overwrite());
        assert_eq!(fs::read(&file).unwrap(), b"original");
    }

    #[test]
    fn create_directory_over_file_fails() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f");
        write(&file, b"");
        let err = LocalOperator.create_directory(&file).unwrap_err();
        assert!(matches!(err, FsError::NotADirectory { .. }));
    }

    #[test]
    fn delete_file_rejects_directory() {
        let tmp = TempDir::new().unwrap();
        let err = LocalOperator.delete_file(tmp.path()).unwrap_err();
        assert!(matches!(err, FsError::NotAFile { .. }));
    }

    #[test]
    fn copy_file_onto_itself_keeps_content() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("same.txt");
        write(&file, b"hello");
        LocalOperator.copy_file(&file, &file, true).unwrap();
        let spelled = tmp.path().join(".").join("same.txt");
        LocalOperator.copy_file(&file, &spelled, true).unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"hello");
    }

    #[test]
    fn copy_directory_onto_itself_keeps_content() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("d");
        LocalOperator.create_directory(&dir).unwrap();
        write(&dir.join("f"), b"data");
        LocalOperator.copy_directory(&dir, &dir).unwrap();
        assert_eq!(fs::read(dir.join("f")).unwrap(), b"data");
    }

    #[test]
    fn stream_copy_from_the_destination_itself() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("loop.txt");
        write(&file, b"payload");
        let mut reader = LocalOperator.read_file(&file).unwrap();
        LocalOperator
            .copy_stream_in(&mut reader, &file, true)
            .unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"payload");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn replacing_stream_copy_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("script");
        write(&file, b"old");
        fs::set_permissions(&file, fs::Permissions::from_mode(0o754)).unwrap();
        LocalOperator
            .copy_stream_in(&mut &b"new"[..], &file, true)
            .unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"new");
        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o754);
    }

    #[test]
    fn move_directory_creates_missing_parents() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("sub");
        LocalOperator.create_directory(&source).unwrap();
        write(&source.join("b.txt"), b"b");
        let destination = tmp.path().join("deep/er/sub");
        LocalOperator.move_directory(&source, &destination).unwrap();
        assert!(destination.join("b.txt").is_file());
        assert!(!source.exists());
    }

    #[cfg(unix)]
    #[test]
    fn change_permissions_applies_mode_bits() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("p");
        write(&file, b"");
        LocalOperator
            .change_permissions(&file, Mode::from_bits(0o640))
            .unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn change_permissions_on_missing_path() {
        let tmp = TempDir::new().unwrap();
        let err = LocalOperator
            .change_permissions(&tmp.path().join("nope"), Mode::from_bits(0o644))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn enumerate_entries_carries_timestamps() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("a"), b"");
        let entries = LocalOperator
            .enumerate_entries(tmp.path(), false)
            .unwrap()
            .collect_all()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].last_modified_utc().is_some());
    }
}
