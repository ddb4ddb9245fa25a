//! In-memory backend.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    Entry, EntryType, Enumeration, FileStream, FsDir, FsEntry, FsError, FsFile, FsPermissions,
    FsStream, Mode,
};

type Nodes = BTreeMap<PathBuf, Node>;

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    modified: DateTime<Utc>,
    mode: Option<Mode>,
}

#[derive(Debug, Clone)]
enum NodeKind {
    File(Vec<u8>),
    Directory,
}

impl Node {
    fn file(data: Vec<u8>) -> Self {
        Self {
            kind: NodeKind::File(data),
            modified: Utc::now(),
            mode: None,
        }
    }

    fn directory() -> Self {
        Self {
            kind: NodeKind::Directory,
            modified: Utc::now(),
            mode: None,
        }
    }

    fn entry_type(&self) -> EntryType {
        match self.kind {
            NodeKind::File(_) => EntryType::File,
            NodeKind::Directory => EntryType::Directory,
        }
    }

    fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File(_))
    }

    fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }
}

/// Backend that keeps the whole tree in memory.
///
/// Paths are normalised lexically and anchored at `/`: `a/./b/../c` and
/// `/a/c` address the same entry. The root directory always exists.
///
/// Cloning is cheap and yields a handle onto the same tree.
///
/// ## Streams
///
/// Writers returned by `create_file` and `open_file` buffer their content and
/// publish it on `flush` and on drop. A file deleted while a stream is open is
/// not resurrected; the next flush reports [`FsError::NotFound`].
///
/// ## Enumeration
///
/// Every `enumerate_*` call takes a snapshot of the tree when it is made.
/// Later mutations never show up in, or disturb, an enumeration in progress.
///
/// ## Permissions
///
/// `change_permissions` records the mode on the entry without enforcing it;
/// [`mode`](MemoryOperator::mode) reads it back.
#[derive(Debug, Clone)]
pub struct MemoryOperator {
    nodes: Arc<RwLock<Nodes>>,
}

impl Default for MemoryOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOperator {
    /// Create an empty tree holding only `/`.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::directory());
        Self {
            nodes: Arc::new(RwLock::new(nodes)),
        }
    }

    /// Mode last applied with `change_permissions`, if any.
    pub fn mode(&self, path: &Path) -> Result<Option<Mode>, FsError> {
        let path = normalize(path);
        let nodes = self.read()?;
        nodes
            .get(&path)
            .map(|node| node.mode)
            .ok_or(FsError::NotFound { path })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Nodes>, FsError> {
        self.nodes.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Nodes>, FsError> {
        self.nodes.write().map_err(|_| poisoned())
    }

    /// Check that a new file may be placed at `path`.
    fn check_file_destination(
        &self,
        nodes: &Nodes,
        path: &Path,
        overwrite: bool,
    ) -> Result<(), FsError> {
        match nodes.get(path) {
            Some(node) if node.is_directory() => {
                return Err(FsError::NotAFile {
                    path: path.to_path_buf(),
                });
            }
            Some(_) if !overwrite => return Err(self.cannot_overwrite_error(path)),
            _ => {}
        }
        require_parent(nodes, path)
    }

    fn snapshot<T, F>(
        &self,
        path: &Path,
        recursive: bool,
        map: F,
    ) -> Result<Enumeration<T>, FsError>
    where
        T: Send + 'static,
        F: Fn(&Path, &Node) -> Option<T>,
    {
        let path = normalize(path);
        let nodes = self.read()?;
        require_directory(&nodes, &path)?;
        let depth = path.components().count();
        let items = descendants(&nodes, &path)
            .filter(|(child, _)| recursive || child.components().count() == depth + 1)
            .filter_map(|(child, node)| map(child, node))
            .map(Ok)
            .collect();
        Ok(Enumeration::from_vec(items))
    }
}

impl FsEntry for MemoryOperator {
    fn exists_file(&self, path: &Path) -> Result<bool, FsError> {
        let nodes = self.read()?;
        Ok(nodes.get(&normalize(path)).is_some_and(Node::is_file))
    }

    fn exists_directory(&self, path: &Path) -> Result<bool, FsError> {
        let nodes = self.read()?;
        Ok(nodes.get(&normalize(path)).is_some_and(Node::is_directory))
    }

    fn entry_type(&self, path: &Path) -> Result<EntryType, FsError> {
        let path = normalize(path);
        let nodes = self.read()?;
        nodes
            .get(&path)
            .map(Node::entry_type)
            .ok_or(FsError::NotFound { path })
    }
}

impl FsFile for MemoryOperator {
    fn delete_file(&self, path: &Path) -> Result<(), FsError> {
        let path = normalize(path);
        let mut nodes = self.write()?;
        match nodes.get(&path) {
            None => Ok(()),
            Some(node) if node.is_directory() => Err(FsError::NotAFile { path }),
            Some(_) => {
                debug!(path = %path.display(), "deleting file");
                nodes.remove(&path);
                touch_parent(&mut nodes, &path);
                Ok(())
            }
        }
    }

    fn create_file(&self, path: &Path, overwrite: bool) -> Result<Box<dyn Write + Send>, FsError> {
        let path = normalize(path);
        let mut nodes = self.write()?;
        self.check_file_destination(&nodes, &path, overwrite)?;
        debug!(path = %path.display(), overwrite, "creating file");
        nodes.insert(path.clone(), Node::file(Vec::new()));
        touch_parent(&mut nodes, &path);
        Ok(Box::new(MemoryStream::new(
            Arc::clone(&self.nodes),
            path,
            Vec::new(),
        )))
    }

    fn open_file(&self, path: &Path) -> Result<Box<dyn FileStream>, FsError> {
        let path = normalize(path);
        let nodes = self.read()?;
        let data = file_data(&nodes, &path)?.to_vec();
        Ok(Box::new(MemoryStream::new(
            Arc::clone(&self.nodes),
            path,
            data,
        )))
    }

    fn read_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError> {
        let path = normalize(path);
        let nodes = self.read()?;
        let data = file_data(&nodes, &path)?.to_vec();
        Ok(Box::new(Cursor::new(data)))
    }

    fn file_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError> {
        let path = normalize(path);
        let nodes = self.read()?;
        match nodes.get(&path) {
            Some(node) if node.is_file() => Ok(node.modified),
            Some(_) => Err(FsError::NotAFile { path }),
            None => Err(FsError::NotFound { path }),
        }
    }

    fn copy_file(&self, source: &Path, destination: &Path, overwrite: bool) -> Result<(), FsError> {
        let (source, destination) = (normalize(source), normalize(destination));
        let mut nodes = self.write()?;
        let data = file_data(&nodes, &source)?.to_vec();
        if source == destination {
            return if overwrite {
                Ok(())
            } else {
                Err(self.cannot_overwrite_error(&destination))
            };
        }
        self.check_file_destination(&nodes, &destination, overwrite)?;
        debug!(source = %source.display(), destination = %destination.display(), "copying file");
        nodes.insert(destination.clone(), Node::file(data));
        touch_parent(&mut nodes, &destination);
        Ok(())
    }

    fn move_file(&self, source: &Path, destination: &Path, overwrite: bool) -> Result<(), FsError> {
        let (source, destination) = (normalize(source), normalize(destination));
        let mut nodes = self.write()?;
        file_data(&nodes, &source)?;
        if source == destination {
            return if overwrite {
                Ok(())
            } else {
                Err(self.cannot_overwrite_error(&destination))
            };
        }
        self.check_file_destination(&nodes, &destination, overwrite)?;
        debug!(source = %source.display(), destination = %destination.display(), "moving file");
        if let Some(mut node) = nodes.remove(&source) {
            node.modified = Utc::now();
            nodes.insert(destination.clone(), node);
        }
        touch_parent(&mut nodes, &source);
        touch_parent(&mut nodes, &destination);
        Ok(())
    }
}

impl FsDir for MemoryOperator {
    fn delete_directory(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        let path = normalize(path);
        let mut nodes = self.write()?;
        match nodes.get(&path) {
            None => return Ok(()),
            Some(node) if node.is_file() => return Err(FsError::NotADirectory { path }),
            Some(_) => {}
        }
        let children: Vec<PathBuf> = descendants(&nodes, &path)
            .map(|(child, _)| child.to_path_buf())
            .collect();
        if !recursive && !children.is_empty() {
            return Err(FsError::DirectoryNotEmpty { path });
        }
        debug!(path = %path.display(), recursive, "deleting directory");
        for child in children {
            nodes.remove(&child);
        }
        // The root survives; deleting it only empties it.
        if path.parent().is_some() {
            nodes.remove(&path);
            touch_parent(&mut nodes, &path);
        }
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        let path = normalize(path);
        let mut nodes = self.write()?;
        ensure_directory(&mut nodes, &path)
    }

    fn enumerate_entry_paths(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Enumeration<PathBuf>, FsError> {
        self.snapshot(path, recursive, |child, _| Some(child.to_path_buf()))
    }

    fn enumerate_directories(&self, path: &Path) -> Result<Enumeration<PathBuf>, FsError> {
        self.snapshot(path, false, |child, node| {
            node.is_directory().then(|| child.to_path_buf())
        })
    }

    fn enumerate_files(&self, path: &Path) -> Result<Enumeration<PathBuf>, FsError> {
        self.snapshot(path, false, |child, node| {
            node.is_file().then(|| child.to_path_buf())
        })
    }

    fn enumerate_entries(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Enumeration<Entry>, FsError> {
        self.snapshot(path, recursive, |child, node| {
            Some(Entry::with_last_modified(
                child,
                node.entry_type(),
                node.modified,
            ))
        })
    }

    fn directory_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError> {
        let path = normalize(path);
        let nodes = self.read()?;
        require_directory(&nodes, &path)?;
        Ok(nodes[&path].modified)
    }

    fn copy_directory(&self, source: &Path, destination: &Path) -> Result<(), FsError> {
        let (source, destination) = (normalize(source), normalize(destination));
        let mut nodes = self.write()?;
        require_directory(&nodes, &source)?;
        let tree: Vec<(PathBuf, Node)> = descendants(&nodes, &source)
            .map(|(child, node)| (child.to_path_buf(), node.clone()))
            .collect();
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            entries = tree.len(),
            "copying directory"
        );
        ensure_directory(&mut nodes, &destination)?;
        for (child, node) in tree {
            let Ok(relative) = child.strip_prefix(&source) else {
                continue;
            };
            let target = destination.join(relative);
            match node.kind {
                NodeKind::Directory => ensure_directory(&mut nodes, &target)?,
                NodeKind::File(data) => {
                    if nodes.get(&target).is_some_and(Node::is_directory) {
                        return Err(FsError::NotAFile { path: target });
                    }
                    nodes.insert(target, Node::file(data));
                }
            }
        }
        touch_parent(&mut nodes, &destination);
        Ok(())
    }

    fn move_directory(&self, source: &Path, destination: &Path) -> Result<(), FsError> {
        let (source, destination) = (normalize(source), normalize(destination));
        let mut nodes = self.write()?;
        require_directory(&nodes, &source)?;
        if nodes.contains_key(&destination) {
            return Err(self.cannot_overwrite_error(&destination));
        }
        if destination.starts_with(&source) {
            return Err(FsError::InvalidData {
                path: destination,
                details: "cannot move a directory into itself".into(),
            });
        }
        if let Some(parent) = destination.parent() {
            ensure_directory(&mut nodes, parent)?;
        }
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            "moving directory"
        );
        let moved: Vec<PathBuf> = std::iter::once(source.clone())
            .chain(descendants(&nodes, &source).map(|(child, _)| child.to_path_buf()))
            .collect();
        for old in moved {
            let Some(node) = nodes.remove(&old) else {
                continue;
            };
            let target = match old.strip_prefix(&source) {
                Ok(relative) if !relative.as_os_str().is_empty() => destination.join(relative),
                _ => destination.clone(),
            };
            nodes.insert(target, node);
        }
        touch_parent(&mut nodes, &source);
        touch_parent(&mut nodes, &destination);
        Ok(())
    }
}

impl FsStream for MemoryOperator {
    fn copy_stream_in(
        &self,
        source: &mut dyn Read,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), FsError> {
        let destination = normalize(destination);
        // Validate before draining so a refused copy leaves the stream unread.
        self.check_file_destination(&*self.read()?, &destination, overwrite)?;
        let mut data = Vec::new();
        source
            .read_to_end(&mut data)
            .map_err(FsError::io("copy_stream_in", &destination))?;
        let mut nodes = self.write()?;
        self.check_file_destination(&nodes, &destination, overwrite)?;
        debug!(destination = %destination.display(), bytes = data.len(), "stream copied in");
        nodes.insert(destination.clone(), Node::file(data));
        touch_parent(&mut nodes, &destination);
        Ok(())
    }

    fn copy_stream_out(&self, source: &Path, destination: &mut dyn Write) -> Result<(), FsError> {
        let source = normalize(source);
        let nodes = self.read()?;
        let data = file_data(&nodes, &source)?.to_vec();
        // Release before writing; the sink may be a stream on this tree.
        drop(nodes);
        destination
            .write_all(&data)
            .and_then(|()| destination.flush())
            .map_err(FsError::io("copy_stream_out", &source))
    }
}

impl FsPermissions for MemoryOperator {
    fn change_permissions(&self, path: &Path, mode: Mode) -> Result<(), FsError> {
        let path = normalize(path);
        let mut nodes = self.write()?;
        let node = nodes
            .get_mut(&path)
            .ok_or_else(|| FsError::NotFound { path: path.clone() })?;
        debug!(path = %path.display(), mode = mode.bits(), "changing permissions");
        node.mode = Some(mode);
        Ok(())
    }
}

/// Read/write handle that publishes its buffer back into the tree.
struct MemoryStream {
    nodes: Arc<RwLock<Nodes>>,
    path: PathBuf,
    buffer: Cursor<Vec<u8>>,
    dirty: bool,
}

impl MemoryStream {
    fn new(nodes: Arc<RwLock<Nodes>>, path: PathBuf, data: Vec<u8>) -> Self {
        Self {
            nodes,
            path,
            buffer: Cursor::new(data),
            dirty: false,
        }
    }

    fn publish(&mut self) -> Result<(), FsError> {
        if !self.dirty {
            return Ok(());
        }
        let mut nodes = self.nodes.write().map_err(|_| poisoned())?;
        match nodes.get_mut(&self.path) {
            Some(node) if node.is_file() => {
                node.kind = NodeKind::File(self.buffer.get_ref().clone());
                node.modified = Utc::now();
                self.dirty = false;
                Ok(())
            }
            _ => Err(FsError::NotFound {
                path: self.path.clone(),
            }),
        }
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.buffer.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.dirty = true;
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(self.publish()?)
    }
}

impl Seek for MemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.buffer.seek(pos)
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        if let Err(err) = self.publish() {
            debug!(path = %self.path.display(), error = %err, "discarding unpublished stream");
        }
    }
}

fn poisoned() -> FsError {
    FsError::Backend("memory tree lock poisoned".into())
}

/// Lexically normalise `path` and anchor it at `/`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => {
                out.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    out
}

/// Strict descendants of `path`, in path order.
fn descendants<'a>(nodes: &'a Nodes, path: &'a Path) -> impl Iterator<Item = (&'a Path, &'a Node)> {
    nodes
        .range::<Path, _>((std::ops::Bound::Excluded(path), std::ops::Bound::Unbounded))
        .map(|(child, node)| (child.as_path(), node))
        .take_while(move |(child, _)| child.starts_with(path))
}

fn file_data<'a>(nodes: &'a Nodes, path: &Path) -> Result<&'a [u8], FsError> {
    match nodes.get(path).map(|node| &node.kind) {
        Some(NodeKind::File(data)) => Ok(data),
        Some(NodeKind::Directory) => Err(FsError::NotAFile {
            path: path.to_path_buf(),
        }),
        None => Err(FsError::NotFound {
            path: path.to_path_buf(),
        }),
    }
}

fn require_directory(nodes: &Nodes, path: &Path) -> Result<(), FsError> {
    match nodes.get(path) {
        Some(node) if node.is_directory() => Ok(()),
        Some(_) => Err(FsError::NotADirectory {
            path: path.to_path_buf(),
        }),
        None => Err(FsError::NotFound {
            path: path.to_path_buf(),
        }),
    }
}

fn require_parent(nodes: &Nodes, path: &Path) -> Result<(), FsError> {
    match path.parent() {
        Some(parent) => require_directory(nodes, parent),
        None => Ok(()),
    }
}

/// Create `path` and any missing ancestors.
fn ensure_directory(nodes: &mut Nodes, path: &Path) -> Result<(), FsError> {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        match nodes.get(&current) {
            Some(node) if node.is_directory() => {}
            Some(_) => {
                return Err(FsError::NotADirectory {
                    path: current.clone(),
                });
            }
            None => {
                debug!(path = %current.display(), "creating directory");
                nodes.insert(current.clone(), Node::directory());
                touch_parent(nodes, &current);
            }
        }
    }
    Ok(())
}

fn touch_parent(nodes: &mut Nodes, path: &Path) {
    if let Some(parent) = path.parent().and_then(|parent| nodes.get_mut(parent)) {
        parent.modified = Utc::now();
    }
}
