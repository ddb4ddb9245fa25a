//! Storage sites: a root directory bound to an operator.

use std::path::{Path, PathBuf};

/// A root directory paired with the operator responsible for it.
///
/// A site owns no files and holds no OS resources. Paths handed to the
/// operator are interpreted relative to [`directory_path`](Site::directory_path)
/// by convention; the site itself does not enforce that.
///
/// `O` is usually a concrete backend, an `Arc<dyn Operator>`, or a reference.
///
/// # Example
///
/// ```rust
/// use site_fs::{FsError, MemoryOperator, OperatorExt, Site};
/// use std::path::Path;
///
/// let site = Site::new("/projects/alpha", MemoryOperator::new());
/// let readme = site.resolve("docs/README.md");
/// assert_eq!(readme, Path::new("/projects/alpha/docs/README.md"));
///
/// site.operator().create_directory_if_missing(site.directory_path())?;
/// assert!(site.operator().exists(site.directory_path())?);
/// # Ok::<(), FsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Site<O> {
    directory_path: PathBuf,
    operator: O,
}

impl<O> Site<O> {
    /// Bind `directory_path` to `operator`.
    pub fn new(directory_path: impl Into<PathBuf>, operator: O) -> Self {
        Self {
            directory_path: directory_path.into(),
            operator,
        }
    }

    /// The root directory of this site.
    #[inline]
    pub fn directory_path(&self) -> &Path {
        &self.directory_path
    }

    /// The operator answering calls for this site.
    #[inline]
    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// Join `relative` onto the site root.
    ///
    /// An absolute `relative` replaces the root, following [`Path::join`].
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.directory_path.join(relative)
    }

    /// Split the site into its root and operator.
    pub fn into_parts(self) -> (PathBuf, O) {
        (self.directory_path, self.operator)
    }
}
