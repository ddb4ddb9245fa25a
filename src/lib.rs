//! # site-fs
//!
//! A backend-agnostic file-system **operator** contract, the derived operations
//! built on top of it, and **sites** that pair a directory with the operator
//! that serves it.
//!
//! Application code is written once against [`Operator`] and runs unchanged
//! over a local disk, an in-memory tree, or any other backend that implements
//! the component traits.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use site_fs::{FsError, MemoryOperator, OperatorExt, Site};
//! use std::path::Path;
//!
//! let site = Site::new("/srv/data", MemoryOperator::new());
//! let report = site.resolve("reports/today.txt");
//!
//! let op = site.operator();
//! op.create_directory_if_missing(Path::new("/srv/data/reports"))?;
//!
//! let mut writer = op.create_text_writer(&report, true)?;
//! writer.write_line("all good")?;
//! writer.close()?;
//!
//! assert!(op.is_existing_file(&report)?);
//! # Ok::<(), FsError>(())
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Operator`] | The primitive contract every backend implements |
//! | [`OperatorExt`] | Derived operations, available on every operator |
//! | [`Site`] | A directory path paired with its operator |
//! | [`Entry`] | Path, type and optional UTC timestamp of one entry |
//! | [`FsError`] | Error type shared by every operation |
//! | [`LocalOperator`] | Backend over `std::fs` |
//! | [`MemoryOperator`] | Backend over an in-memory tree |
//!
//! ---
//!
//! ## Trait Composition
//!
//! ```text
//! FsEntry + FsFile + FsDir + FsStream + FsPermissions = Operator
//!                                                         ↓
//!                                                    OperatorExt
//! ```
//!
//! [`Operator`] and [`OperatorExt`] have **blanket implementations**. Implement
//! the five components and everything else comes for free.
//!
//! ---
//!
//! ## Error Handling
//!
//! ```rust
//! use site_fs::FsError;
//! use std::path::PathBuf;
//!
//! let err = FsError::NotFound { path: PathBuf::from("/missing.txt") };
//! assert_eq!(err.to_string(), "not found: /missing.txt");
//! assert!(err.is_not_found());
//! ```
//!
//! ---
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and every method takes `&self`. Share an
//! operator across threads with `Arc<O>` or `Arc<dyn Operator>`.
//!
//! ---
//!
//! ## Logging
//!
//! Backends emit `tracing` events at `DEBUG` for mutations. Wrap any operator
//! in [`TracingLayer`] to get a `TRACE` event per primitive call and a `WARN`
//! event per failure. Install a subscriber in the application to see them.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`Entry`], [`EntryType`], [`Mode`] and [`OperatorExtJson`] |

// Private modules
mod backends;
mod error;
mod ext;
mod layer;
mod site;
mod traits;
mod types;

// Public re-exports - error types
pub use error::FsError;

// Public re-exports - core types
pub use types::{Entry, EntryType, Mode};

// Public re-exports - operator traits
pub use traits::{
    Enumeration, FileStream, FsDir, FsEntry, FsFile, FsPermissions, FsStream, Operator,
};

// Public re-exports - derived operations
pub use ext::{OperatorExt, TextWriter, copy_across_operators};

// Public re-exports - sites
pub use site::Site;

// Public re-exports - backends
pub use backends::{LocalOperator, MemoryOperator};

// Public re-exports - middleware
pub use layer::{Layer, LayerExt, Traced, TracingLayer};

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::OperatorExtJson;
