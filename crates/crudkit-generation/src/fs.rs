//! File system access used by builders and aggregators
//!
//! Every read and write of the generation engine goes through [`FileSystem`],
//! so runs can be previewed or tested against [`MemoryFileSystem`].

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{GenerationError, Result};

/// Minimal file access needed by a generation run
pub trait FileSystem {
    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as text
    fn read(&self, path: &Path) -> Result<String>;

    /// Replace the file at `path` with `contents` in a single write
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// The real file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| GenerationError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| GenerationError::WriteFailure {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(path, contents).map_err(|source| GenerationError::WriteFailure {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Wrote {} byte(s) to {}", contents.len(), path.display());
        Ok(())
    }
}

/// In-memory file system for previews and tests
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, String>>,
    writes: Cell<usize>,
}

impl MemoryFileSystem {
    /// Create an empty file system
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without counting it as a write
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    /// Current contents of a file
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    /// Every stored path, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    /// Number of writes performed so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.contents(path)
            .ok_or_else(|| GenerationError::ReadFailure {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
