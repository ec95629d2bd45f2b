//! Theme-scoped template registry
//!
//! A registry is a stack of [`TemplateSource`] layers. Lookups walk the stack
//! from the top, so a layer pushed later overrides every template name it
//! defines and inherits the rest.

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

use crate::templates::error::TemplateError;

/// File extension used for template files on disk
pub const TEMPLATE_EXTENSION: &str = "stub";

/// Supplies raw template text by name
pub trait TemplateSource: Send + Sync {
    /// Load a template, or `None` when this source does not define it
    fn load(&self, name: &str) -> Result<Option<String>, TemplateError>;

    /// Every template name this source defines
    fn names(&self) -> Vec<String>;

    /// Short description used in logs
    fn label(&self) -> String;
}

/// Templates compiled into the binary
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource {
    label: String,
    templates: HashMap<String, String>,
}

impl EmbeddedSource {
    /// Create an empty embedded source
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            templates: HashMap::new(),
        }
    }

    /// Add a template
    pub fn with(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.templates.insert(name.into(), content.into());
        self
    }
}

impl TemplateSource for EmbeddedSource {
    fn load(&self, name: &str) -> Result<Option<String>, TemplateError> {
        Ok(self.templates.get(name).cloned())
    }

    fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    fn label(&self) -> String {
        format!("embedded:{}", self.label)
    }
}

/// Templates read from `<dir>/<name>.stub`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this source reads from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION))
    }
}

impl TemplateSource for DirectorySource {
    fn load(&self, name: &str) -> Result<Option<String>, TemplateError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(content))
    }

    fn names(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().and_then(|ext| ext.to_str()) == Some(TEMPLATE_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect()
    }

    fn label(&self) -> String {
        format!("dir:{}", self.dir.display())
    }
}

/// Layered template lookup for one theme
#[derive(Clone)]
pub struct TemplateRegistry {
    theme: String,
    layers: Vec<Arc<dyn TemplateSource>>,
}

impl TemplateRegistry {
    /// Create a registry with no layers
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            layers: Vec::new(),
        }
    }

    /// Create a registry for a child theme that inherits every layer of `self`
    pub fn extend(&self, theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            layers: self.layers.clone(),
        }
    }

    /// Push a layer on top of the stack
    pub fn push_layer(&mut self, source: impl TemplateSource + 'static) {
        self.layers.push(Arc::new(source));
    }

    /// Builder-style variant of [`TemplateRegistry::push_layer`]
    pub fn with_layer(mut self, source: impl TemplateSource + 'static) -> Self {
        self.push_layer(source);
        self
    }

    /// Name of the owning theme
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Resolve a template by name; the topmost layer defining it wins
    pub fn resolve(&self, name: &str) -> Result<String, TemplateError> {
        for layer in self.layers.iter().rev() {
            if let Some(content) = layer.load(name)? {
                debug!("Resolved template {} from {}", name, layer.label());
                return Ok(content);
            }
        }

        Err(TemplateError::NotFound {
            name: name.to_string(),
            theme: self.theme.clone(),
        })
    }

    /// Whether any layer defines `name`
    pub fn contains(&self, name: &str) -> bool {
        self.layers
            .iter()
            .any(|layer| matches!(layer.load(name), Ok(Some(_))))
    }

    /// Every resolvable template name, sorted
    pub fn names(&self) -> Vec<String> {
        self.layers
            .iter()
            .flat_map(|layer| layer.names())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("theme", &self.theme)
            .field(
                "layers",
                &self.layers.iter().map(|l| l.label()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn base() -> TemplateRegistry {
        TemplateRegistry::new("base").with_layer(
            EmbeddedSource::new("base")
                .with("views.create", "base create")
                .with("views.edit", "base edit"),
        )
    }

    #[test]
    fn test_resolve_known_template() {
        assert_eq!(base().resolve("views.create").unwrap(), "base create");
    }

    #[test]
    fn test_resolve_missing_template() {
        let err = base().resolve("views.missing").unwrap_err();
        match err {
            TemplateError::NotFound { name, theme } => {
                assert_eq!(name, "views.missing");
                assert_eq!(theme, "base");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extend_overrides_single_template() {
        let child = base()
            .extend("child")
            .with_layer(EmbeddedSource::new("child").with("views.create", "child create"));

        assert_eq!(child.resolve("views.create").unwrap(), "child create");
        assert_eq!(child.resolve("views.edit").unwrap(), "base edit");
        assert_eq!(child.theme(), "child");
    }

    #[test]
    fn test_extend_leaves_parent_untouched() {
        let parent = base();
        let _child = parent
            .extend("child")
            .with_layer(EmbeddedSource::new("child").with("views.create", "child create"));
        assert_eq!(parent.resolve("views.create").unwrap(), "base create");
    }

    #[test]
    fn test_names_are_union_of_layers() {
        let child = base()
            .extend("child")
            .with_layer(EmbeddedSource::new("child").with("router", "r"));
        assert_eq!(
            child.names(),
            vec![
                "router".to_string(),
                "views.create".to_string(),
                "views.edit".to_string()
            ]
        );
    }

    #[test]
    fn test_directory_source_overrides_embedded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("views.edit.stub"), "custom edit").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = base().with_layer(DirectorySource::new(dir.path()));
        assert_eq!(registry.resolve("views.edit").unwrap(), "custom edit");
        assert_eq!(registry.resolve("views.create").unwrap(), "base create");
        assert!(registry.contains("views.edit"));
        assert_eq!(
            DirectorySource::new(dir.path()).names(),
            vec!["views.edit".to_string()]
        );
    }

    #[test]
    fn test_directory_source_missing_dir_has_no_names() {
        let source = DirectorySource::new("/definitely/not/here");
        assert!(source.names().is_empty());
        assert!(source.load("views.create").unwrap().is_none());
    }
}
