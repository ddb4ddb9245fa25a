//! Stream-based transfer across backend boundaries.

use std::io::{Read, Write};
use std::path::Path;

use crate::FsError;

/// Transfer between a backend path and a generic byte stream.
///
/// These are the primitives that let two unrelated backends exchange data
/// without holding a whole file in memory; see
/// [`copy_across_operators`](crate::copy_across_operators).
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsStream`.
pub trait FsStream: Send + Sync {
    /// Drain `source` into the file at `destination`.
    ///
    /// # Errors
    ///
    /// - [`FsError::CannotOverwrite`] if the destination exists and
    ///   `overwrite` is `false`
    fn copy_stream_in(
        &self,
        source: &mut dyn Read,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), FsError>;

    /// Write the contents of the file at `source` into `destination`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the source file does not exist
    fn copy_stream_out(&self, source: &Path, destination: &mut dyn Write) -> Result<(), FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_stream_is_object_safe() {
        fn _check(_: &dyn FsStream) {}
    }
}
