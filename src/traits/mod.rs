//! # Operator Traits
//!
//! The contract every storage backend implements.
//!
//! ## Components
//!
//! ```text
//! FsEntry + FsFile + FsDir + FsStream + FsPermissions = Operator
//! ```
//!
//! | Trait | Methods |
//! |-------|---------|
//! | [`FsEntry`] | `exists_file`, `exists_directory`, `entry_type`, overwrite factories |
//! | [`FsFile`] | `create_file`, `open_file`, `read_file`, `delete_file`, `copy_file`, `move_file`, timestamps |
//! | [`FsDir`] | `create_directory`, `delete_directory`, `enumerate_*`, `copy_directory`, `move_directory`, timestamps |
//! | [`FsStream`] | `copy_stream_in`, `copy_stream_out` |
//! | [`FsPermissions`] | `change_permissions` |
//!
//! ## Blanket Implementation
//!
//! [`Operator`] is implemented automatically for any type implementing all
//! five components. Generic code depends on `Operator` (or `dyn Operator`) and
//! never on a concrete backend.
//!
//! ## Object Safety
//!
//! All traits are object-safe:
//!
//! ```rust
//! use site_fs::{FsEntry, Operator};
//! use std::path::Path;
//!
//! fn probe(op: &dyn Operator) -> bool {
//!     op.exists_file(Path::new("/file.txt")).unwrap_or(false)
//! }
//! ```

mod fs_dir;
mod fs_entry;
mod fs_file;
mod fs_permissions;
mod fs_stream;

pub use fs_dir::{Enumeration, FsDir};
pub use fs_entry::FsEntry;
pub use fs_file::{FileStream, FsFile};
pub use fs_permissions::FsPermissions;
pub use fs_stream::FsStream;

/// A complete storage backend.
///
/// Combines every component trait. Derived behavior lives in
/// [`OperatorExt`](crate::OperatorExt), which every `Operator` gets for free.
///
/// # Blanket Implementation
///
/// Never implement `Operator` directly; implement the components.
///
/// # Example
///
/// ```rust
/// use site_fs::{FsDir, FsError, FsFile, MemoryOperator, Operator};
/// use std::io::{Read, Write};
/// use std::path::Path;
///
/// fn stamp<O: Operator>(op: &O) -> Result<String, FsError> {
///     op.create_directory(Path::new("/logs"))?;
///     let mut w = op.create_file(Path::new("/logs/today"), true)?;
///     w.write_all(b"ok")?;
///     w.flush()?;
///     drop(w);
///
///     let mut text = String::new();
///     op.read_file(Path::new("/logs/today"))?.read_to_string(&mut text)?;
///     Ok(text)
/// }
///
/// assert_eq!(stamp(&MemoryOperator::new())?, "ok");
/// # Ok::<(), FsError>(())
/// ```
pub trait Operator: FsEntry + FsFile + FsDir + FsStream + FsPermissions {}

impl<T: FsEntry + FsFile + FsDir + FsStream + FsPermissions> Operator for T {}
