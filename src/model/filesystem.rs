//! File system access used when opening documents.
//!
//! Behind a trait so document loading can be tested without touching disk.

use std::io;
use std::path::{Path, PathBuf};

pub trait FileSystem: Send + Sync {
    /// Read a file's full contents
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Resolve a path to the canonical form used as a registry key
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The real file system
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}
