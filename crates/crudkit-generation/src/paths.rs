//! Destination path resolution

use std::path::{Path, PathBuf};

use crate::naming::Names;

/// Turns an artifact's path pattern into a destination
pub trait PathResolver {
    /// Destination of an artifact whose path pattern is `pattern`
    fn resolve(&self, pattern: &str, names: &Names) -> PathBuf;

    /// Human-readable form of `path`, used in messages
    fn display(&self, path: &Path) -> String;
}

/// Resolves patterns such as `views/{{model-names}}/create.blade.php` under a root
#[derive(Debug, Clone)]
pub struct ConventionalPathResolver {
    root: PathBuf,
}

impl ConventionalPathResolver {
    /// Create a resolver rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for ConventionalPathResolver {
    fn resolve(&self, pattern: &str, names: &Names) -> PathBuf {
        let relative = names.substitutions().apply(pattern);
        relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    fn display(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}
