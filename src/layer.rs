//! # Layer Trait
//!
//! Tower-style middleware composition for operators.
//!
//! ## How It Works
//!
//! ```text
//! Operator ──▶ Layer::layer() ──▶ Wrapped Operator
//! ```
//!
//! A middleware provides a wrapper struct implementing the component traits
//! and a [`Layer`] that builds it. Because the wrapper is itself an
//! [`Operator`], every derived operation in [`OperatorExt`](crate::OperatorExt)
//! keeps working through it.
//!
//! [`TracingLayer`] is the built-in middleware: it emits a `tracing` event for
//! every primitive call.
//!
//! ```rust
//! use site_fs::{LayerExt, MemoryOperator, OperatorExt, TracingLayer};
//! use std::path::Path;
//!
//! let op = MemoryOperator::new().layer(TracingLayer::new("scratch"));
//! assert!(!op.exists(Path::new("/nothing")).unwrap());
//! ```

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{trace, warn};

use crate::{
    Entry, EntryType, Enumeration, FileStream, FsDir, FsEntry, FsError, FsFile, FsPermissions,
    FsStream, Mode, Operator,
};

/// A layer that wraps an operator to add functionality.
///
/// Inspired by Tower's `Layer` trait.
///
/// # Design Notes
///
/// - `layer(self, operator)` consumes both the layer and the operator
/// - The resulting `Operator` type should implement the same traits as the
///   input so it stays substitutable
pub trait Layer<O> {
    /// The resulting operator type after applying this layer.
    type Operator;

    /// Wrap the given operator with this layer's functionality.
    fn layer(self, operator: O) -> Self::Operator;
}

/// Extension trait for fluent layer composition.
///
/// ```rust
/// use site_fs::{Layer, LayerExt, Operator};
///
/// fn compose<O: Operator, L: Layer<O>>(operator: O, layer: L) -> L::Operator {
///     operator.layer(layer)
/// }
/// ```
pub trait LayerExt: Operator + Sized {
    /// Apply a layer to this operator.
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Operator {
        layer.layer(self)
    }
}

// Blanket implementation - any Operator gets LayerExt for free
impl<O: Operator> LayerExt for O {}

/// Layer producing [`Traced`] operators.
#[derive(Debug, Clone)]
pub struct TracingLayer {
    name: String,
}

impl TracingLayer {
    /// Label every event with `name`, e.g. the site the operator serves.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<O: Operator> Layer<O> for TracingLayer {
    type Operator = Traced<O>;

    fn layer(self, operator: O) -> Self::Operator {
        Traced {
            inner: operator,
            name: self.name,
        }
    }
}

/// Operator middleware that reports each primitive call.
///
/// Calls are logged at `TRACE`; failures are logged again at `WARN` with the
/// error, then returned unchanged.
#[derive(Debug, Clone)]
pub struct Traced<O> {
    inner: O,
    name: String,
}

impl<O> Traced<O> {
    /// The wrapped operator.
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Unwrap the middleware.
    pub fn into_inner(self) -> O {
        self.inner
    }

    fn call<T>(
        &self,
        operation: &'static str,
        path: &Path,
        f: impl FnOnce(&O) -> Result<T, FsError>,
    ) -> Result<T, FsError> {
        trace!(operator = %self.name, operation, path = %path.display());
        let result = f(&self.inner);
        if let Err(err) = &result {
            warn!(operator = %self.name, operation, path = %path.display(), error = %err);
        }
        result
    }
}

impl<O: FsEntry> FsEntry for Traced<O> {
    fn exists_file(&self, path: &Path) -> Result<bool, FsError> {
        self.call("exists_file", path, |op| op.exists_file(path))
    }

    fn exists_directory(&self, path: &Path) -> Result<bool, FsError> {
        self.call("exists_directory", path, |op| op.exists_directory(path))
    }

    fn entry_type(&self, path: &Path) -> Result<EntryType, FsError> {
        self.call("entry_type", path, |op| op.entry_type(path))
    }

    fn cannot_overwrite_message(&self, path: &Path) -> String {
        self.inner.cannot_overwrite_message(path)
    }

    fn cannot_overwrite_error(&self, path: &Path) -> FsError {
        self.inner.cannot_overwrite_error(path)
    }
}

impl<O: FsFile> FsFile for Traced<O> {
    fn delete_file(&self, path: &Path) -> Result<(), FsError> {
        self.call("delete_file", path, |op| op.delete_file(path))
    }

    fn create_file(&self, path: &Path, overwrite: bool) -> Result<Box<dyn Write + Send>, FsError> {
        self.call("create_file", path, |op| op.create_file(path, overwrite))
    }

    fn open_file(&self, path: &Path) -> Result<Box<dyn FileStream>, FsError> {
        self.call("open_file", path, |op| op.open_file(path))
    }

    fn read_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError> {
        self.call("read_file", path, |op| op.read_file(path))
    }

    fn file_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError> {
        self.call("file_last_modified_utc", path, |op| {
            op.file_last_modified_utc(path)
        })
    }

    fn copy_file(&self, source: &Path, destination: &Path, overwrite: bool) -> Result<(), FsError> {
        self.call("copy_file", source, |op| {
            op.copy_file(source, destination, overwrite)
        })
    }

    fn move_file(&self, source: &Path, destination: &Path, overwrite: bool) -> Result<(), FsError> {
        self.call("move_file", source, |op| {
            op.move_file(source, destination, overwrite)
        })
    }
}

impl<O: FsDir> FsDir for Traced<O> {
    fn delete_directory(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        self.call("delete_directory", path, |op| {
            op.delete_directory(path, recursive)
        })
    }

    fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        self.call("create_directory", path, |op| op.create_directory(path))
    }

    fn enumerate_entry_paths(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Enumeration<PathBuf>, FsError> {
        self.call("enumerate_entry_paths", path, |op| {
            op.enumerate_entry_paths(path, recursive)
        })
    }

    fn enumerate_directories(&self, path: &Path) -> Result<Enumeration<PathBuf>, FsError> {
        self.call("enumerate_directories", path, |op| {
            op.enumerate_directories(path)
        })
    }

    fn enumerate_files(&self, path: &Path) -> Result<Enumeration<PathBuf>, FsError> {
        self.call("enumerate_files", path, |op| op.enumerate_files(path))
    }

    fn enumerate_entries(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Enumeration<Entry>, FsError> {
        self.call("enumerate_entries", path, |op| {
            op.enumerate_entries(path, recursive)
        })
    }

    fn directory_last_modified_utc(&self, path: &Path) -> Result<DateTime<Utc>, FsError> {
        self.call("directory_last_modified_utc", path, |op| {
            op.directory_last_modified_utc(path)
        })
    }

    fn copy_directory(&self, source: &Path, destination: &Path) -> Result<(), FsError> {
        self.call("copy_directory", source, |op| {
            op.copy_directory(source, destination)
        })
    }

    fn move_directory(&self, source: &Path, destination: &Path) -> Result<(), FsError> {
        self.call("move_directory", source, |op| {
            op.move_directory(source, destination)
        })
    }
}

impl<O: FsStream> FsStream for Traced<O> {
    fn copy_stream_in(
        &self,
        source: &mut dyn Read,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), FsError> {
        self.call("copy_stream_in", destination, |op| {
            op.copy_stream_in(source, destination, overwrite)
        })
    }

    fn copy_stream_out(&self, source: &Path, destination: &mut dyn Write) -> Result<(), FsError> {
        self.call("copy_stream_out", source, |op| {
            op.copy_stream_out(source, destination)
        })
    }
}

impl<O: FsPermissions> FsPermissions for Traced<O> {
    fn change_permissions(&self, path: &Path, mode: Mode) -> Result<(), FsError> {
        self.call("change_permissions", path, |op| {
            op.change_permissions(path, mode)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryOperator, OperatorExt};

    #[test]
    fn layer_ext_is_auto_implemented() {
        fn _check<O: Operator + LayerExt>() {}
        _check::<MemoryOperator>();
    }

    #[test]
    fn traced_operator_is_an_operator() {
        fn _check<O: Operator>() {}
        _check::<Traced<MemoryOperator>>();
    }

    #[test]
    fn traced_forwards_calls_and_errors() {
        let op = MemoryOperator::new().layer(TracingLayer::new("test"));
        op.create_directory(Path::new("/d")).unwrap();
        assert!(op.exists(Path::new("/d")).unwrap());
        assert!(op.entry_type(Path::new("/missing")).unwrap_err().is_not_found());
    }

    #[test]
    fn traced_keeps_inner_overwrite_wording() {
        let op = MemoryOperator::new().layer(TracingLayer::new("test"));
        assert_eq!(
            op.cannot_overwrite_message(Path::new("/x")),
            op.inner().cannot_overwrite_message(Path::new("/x"))
        );
    }

    #[test]
    fn layers_stack() {
        let op = MemoryOperator::new()
            .layer(TracingLayer::new("inner"))
            .layer(TracingLayer::new("outer"));
        op.create_directory(Path::new("/a/b")).unwrap();
        let inner: MemoryOperator = op.into_inner().into_inner();
        assert!(inner.exists_directory(Path::new("/a/b")).unwrap());
    }
}
