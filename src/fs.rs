//! Filesystem access
//!
//! The destructive half of table deletion goes through [`Filesystem`] so the
//! server can be pointed at something other than the local disk.

use std::fs;
use std::io;
use std::path::Path;

/// Filesystem operations used by the handlers
pub trait Filesystem: Send + Sync {
    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Remove `path` and everything below it
    ///
    /// A failure part way through leaves whatever was not yet removed in place.
    fn remove_recursive(&self, path: &Path) -> io::Result<()>;
}

/// The local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as present
        fs::symlink_metadata(path).is_ok()
    }

    fn remove_recursive(&self, path: &Path) -> io::Result<()> {
        let metadata = fs::symlink_metadata(path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}
