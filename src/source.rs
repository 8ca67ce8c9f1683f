//! Unit source port and adapters.
//!
//! The loader never touches the filesystem directly; every probe and read goes
//! through a `UnitSource`.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Read-only access to unit files
pub trait UnitSource: Send + Sync {
    /// Whether a unit file exists at `path`
    fn exists(&self, path: &Path) -> bool;
    /// Read the unit file at `path`
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Unit files on the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsUnitSource;

impl UnitSource for FsUnitSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory unit files, keyed by path.
///
/// Counts every `exists` and `read` call so callers can observe how much work the
/// loader did.
#[derive(Debug, Default)]
pub struct MemoryUnitSource {
    files: RwLock<HashMap<PathBuf, String>>,
    accesses: AtomicUsize,
}

impl MemoryUnitSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.write().insert(path.into(), content.into());
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Total `exists` + `read` calls so far
    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    /// Paths of all stored files, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl UnitSource for MemoryUnitSource {
    fn exists(&self, path: &Path) -> bool {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.files.read().contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.files.read().get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no unit file at {}", path.display()),
            )
        })
    }
}

impl<S: UnitSource + ?Sized> UnitSource for std::sync::Arc<S> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        (**self).read(path)
    }
}
