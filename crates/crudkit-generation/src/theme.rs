//! Themes: templates, compilers and the artifacts built from them
//!
//! A [`Theme`] is passed explicitly to every run. Built-in themes are held by
//! a [`ThemeRegistry`] value; nothing is looked up through process-wide state.

use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use tracing::debug;

use crate::{
    compilers::{blade, model, rules, schema, vue, Compiler, CompilerKind},
    error::{GenerationError, Result},
    templates::{DirectorySource, EmbeddedSource, Substitutions, TemplateRegistry, TemplateSource},
};

/// Name of the server-rendered built-in theme
pub const DEFAULT_THEME: &str = "default";

/// Name of the single-file-component built-in theme
pub const VUE_THEME: &str = "vue";

/// Marker left in shared registration files so later runs can insert again
pub const ROUTES_MARKER: &str = "// crudkit:routes";

/// One line tag of an artifact template and the compiler that fills it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Line tag, without the leading `#`
    pub tag: String,
    /// Compiler rendering the entity's entries
    pub compiler: CompilerKind,
    /// Text used when the compiler renders nothing
    pub on_empty: String,
}

impl Section {
    /// Create a section that disappears when empty
    pub fn new(tag: impl Into<String>, compiler: CompilerKind) -> Self {
        Self {
            tag: tag.into(),
            compiler,
            on_empty: String::new(),
        }
    }

    /// Set the placeholder used for entities that render nothing here
    pub fn on_empty(mut self, text: impl Into<String>) -> Self {
        self.on_empty = text.into();
        self
    }
}

/// Registration of an artifact into a shared aggregation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Id of the target aggregator
    pub aggregator: String,
    /// Extra fragment values; may themselves contain name tokens
    pub values: Substitutions,
}

/// Describes one generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// Artifact name, unique within a theme
    pub name: String,
    /// Template rendered for this artifact
    pub template: String,
    /// Destination pattern relative to the output root, with name tokens
    pub path: String,
    /// Sections filled by compilers, in substitution order
    pub sections: Vec<Section>,
    /// Optional registration into a shared file
    pub registration: Option<Registration>,
}

impl ArtifactSpec {
    /// Create an artifact without sections
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            path: path.into(),
            sections: Vec::new(),
            registration: None,
        }
    }

    /// Add a section
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Register this artifact into `aggregator` with the given fragment values
    pub fn registers_into(mut self, aggregator: impl Into<String>, values: Substitutions) -> Self {
        self.registration = Some(Registration {
            aggregator: aggregator.into(),
            values,
        });
        self
    }
}

/// Describes one shared aggregation file and the templates that build it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorSpec {
    /// Aggregator id referenced by registrations
    pub id: String,
    /// Destination pattern relative to the output root
    pub path: String,
    /// Full file skeleton containing a `#BODY` tag
    pub skeleton: String,
    /// Body template containing `#IMPORTS`, `#ROUTES` and the marker
    pub body: String,
    /// Fragment template rendered once per registration into `#IMPORTS`
    pub import: String,
    /// Fragment template rendered once per registration into `#ROUTES`
    pub route: String,
    /// Insertion marker
    pub marker: String,
}

impl AggregatorSpec {
    /// Describe an aggregate whose templates are named `<template>`, `<template>.body`,
    /// `<template>.import` and `<template>.route`
    pub fn new(id: impl Into<String>, path: impl Into<String>, template: &str) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            skeleton: template.to_string(),
            body: format!("{}.body", template),
            import: format!("{}.import", template),
            route: format!("{}.route", template),
            marker: ROUTES_MARKER.to_string(),
        }
    }
}

/// A named bundle of templates, compilers and artifacts
#[derive(Debug, Clone)]
pub struct Theme {
    name: String,
    templates: TemplateRegistry,
    compilers: HashMap<CompilerKind, Compiler>,
    artifacts: Vec<ArtifactSpec>,
    aggregators: Vec<AggregatorSpec>,
}

impl Theme {
    /// Create an empty theme
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            templates: TemplateRegistry::new(name.clone()),
            name,
            compilers: HashMap::new(),
            artifacts: Vec::new(),
            aggregators: Vec::new(),
        }
    }

    /// Create a child theme inheriting everything from `self`
    pub fn extend(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            templates: self.templates.extend(name.clone()),
            name,
            compilers: self.compilers.clone(),
            artifacts: self.artifacts.clone(),
            aggregators: self.aggregators.clone(),
        }
    }

    /// Push a template layer overriding every name it defines
    pub fn with_templates(mut self, source: impl TemplateSource + 'static) -> Self {
        self.templates.push_layer(source);
        self
    }

    /// Push a directory of `.stub` overrides
    pub fn with_templates_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.with_templates(DirectorySource::new(dir))
    }

    /// Register or replace the compiler for `kind`
    pub fn with_compiler(mut self, kind: CompilerKind, compiler: Compiler) -> Self {
        self.compilers.insert(kind, compiler);
        self
    }

    /// Add an artifact, replacing one with the same name in place
    pub fn with_artifact(mut self, artifact: ArtifactSpec) -> Self {
        match self.artifacts.iter_mut().find(|a| a.name == artifact.name) {
            Some(slot) => *slot = artifact,
            None => self.artifacts.push(artifact),
        }
        self
    }

    /// Drop an artifact by name
    pub fn without_artifact(mut self, name: &str) -> Self {
        self.artifacts.retain(|a| a.name != name);
        self
    }

    /// Add an aggregator, replacing one with the same id
    pub fn with_aggregator(mut self, aggregator: AggregatorSpec) -> Self {
        match self.aggregators.iter_mut().find(|a| a.id == aggregator.id) {
            Some(slot) => *slot = aggregator,
            None => self.aggregators.push(aggregator),
        }
        self
    }

    /// Theme name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template lookup for this theme
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Compiler registered for `kind`
    pub fn compiler(&self, kind: CompilerKind) -> Result<&Compiler> {
        self.compilers
            .get(&kind)
            .ok_or_else(|| GenerationError::MissingCompiler {
                theme: self.name.clone(),
                compiler: kind.to_string(),
            })
    }

    /// Artifacts in build order
    pub fn artifacts(&self) -> &[ArtifactSpec] {
        &self.artifacts
    }

    /// Look up an artifact by name
    pub fn artifact(&self, name: &str) -> Option<&ArtifactSpec> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    /// Aggregators in flush order
    pub fn aggregators(&self) -> &[AggregatorSpec] {
        &self.aggregators
    }

    /// Look up an aggregator by id
    pub fn aggregator(&self, id: &str) -> Option<&AggregatorSpec> {
        self.aggregators.iter().find(|a| a.id == id)
    }
}

/// Holds the themes a host can choose from
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
}

impl ThemeRegistry {
    /// Registry holding the built-in themes
    pub fn new() -> Self {
        let default = default_theme();
        let vue = vue_theme(&default);
        Self::empty().with_theme(default).with_theme(vue)
    }

    /// Registry without any theme
    pub fn empty() -> Self {
        Self {
            themes: BTreeMap::new(),
        }
    }

    /// Register a theme, replacing one with the same name
    pub fn register(&mut self, theme: Theme) {
        debug!("Registered theme {}", theme.name());
        self.themes.insert(theme.name().to_string(), theme);
    }

    /// Builder-style variant of [`ThemeRegistry::register`]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.register(theme);
        self
    }

    /// Look up a theme by name
    pub fn get(&self, name: &str) -> Result<&Theme> {
        self.themes
            .get(name)
            .ok_or_else(|| GenerationError::ThemeNotFound(name.to_string()))
    }

    /// Registered theme names, sorted
    pub fn names(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! embedded_stubs {
    ($label:expr, $dir:literal, [$($name:literal),+ $(,)?]) => {
        EmbeddedSource::new($label)
            $(.with($name, include_str!(concat!("../stubs/", $dir, "/", $name, ".stub"))))+
    };
}

/// Server-rendered views with a resource controller
pub fn default_theme() -> Theme {
    let templates = embedded_stubs!(
        "embedded:default",
        "default",
        [
            "migration",
            "model",
            "request",
            "controller",
            "views.index",
            "views.show",
            "views.create",
            "views.edit",
            "routes.web",
            "routes.web.body",
            "routes.web.import",
            "routes.web.route",
        ]
    );

    let view = |name: &str, file: &str| {
        ArtifactSpec::new(
            format!("views.{}", name),
            format!("views.{}", name),
            format!("views/{{{{model-names}}}}/{}.blade.php", file),
        )
    };

    Theme::new(DEFAULT_THEME)
        .with_templates(templates)
        .with_compiler(CompilerKind::Schema, schema::compiler())
        .with_compiler(CompilerKind::Fillable, model::fillable())
        .with_compiler(CompilerKind::Casts, model::casts())
        .with_compiler(CompilerKind::Traits, model::traits())
        .with_compiler(CompilerKind::Rules, rules::compiler())
        .with_compiler(CompilerKind::Form, blade::form())
        .with_compiler(CompilerKind::TableHead, blade::table_head())
        .with_compiler(CompilerKind::TableRow, blade::table_row())
        .with_compiler(CompilerKind::Detail, blade::detail())
        .with_artifact(
            ArtifactSpec::new(
                "migration",
                "migration",
                "database/migrations/create_{{model_names}}_table.php",
            )
            .with_section(Section::new("COLUMNS", CompilerKind::Schema).on_empty("//")),
        )
        .with_artifact(
            ArtifactSpec::new("model", "model", "app/Models/{{ModelName}}.php")
                .with_section(Section::new("TRAITS", CompilerKind::Traits))
                .with_section(Section::new("FILLABLE", CompilerKind::Fillable).on_empty("//"))
                .with_section(Section::new("CASTS", CompilerKind::Casts).on_empty("//")),
        )
        .with_artifact(
            ArtifactSpec::new(
                "request",
                "request",
                "app/Http/Requests/{{ModelName}}Request.php",
            )
            .with_section(Section::new("RULES", CompilerKind::Rules).on_empty("//")),
        )
        .with_artifact(
            ArtifactSpec::new(
                "controller",
                "controller",
                "app/Http/Controllers/{{ModelName}}Controller.php",
            )
            .registers_into("routes", Substitutions::new()),
        )
        .with_artifact(
            view("index", "index")
                .with_section(Section::new("TABLE_HEAD", CompilerKind::TableHead))
                .with_section(Section::new("TABLE_ROW", CompilerKind::TableRow)),
        )
        .with_artifact(
            view("show", "show").with_section(
                Section::new("CONTENT", CompilerKind::Detail).on_empty("{{-- no fields --}}"),
            ),
        )
        .with_artifact(
            view("create", "create").with_section(
                Section::new("CONTENT", CompilerKind::Form).on_empty("{{-- no fields --}}"),
            ),
        )
        .with_artifact(
            view("edit", "edit").with_section(
                Section::new("CONTENT", CompilerKind::Form).on_empty("{{-- no fields --}}"),
            ),
        )
        .with_aggregator(AggregatorSpec::new("routes", "routes/web.php", "routes.web"))
}

/// Single-file components talking to a JSON controller
pub fn vue_theme(base: &Theme) -> Theme {
    let templates = embedded_stubs!(
        "embedded:vue",
        "vue",
        [
            "controller",
            "routes.web.route",
            "components.index",
            "components.show",
            "components.create",
            "components.edit",
            "router",
            "router.body",
            "router.import",
            "router.route",
        ]
    );

    let component = |name: &str, suffix: &str, route_path: &str| {
        let component = format!("{{{{ModelName}}}}{}", suffix);
        ArtifactSpec::new(
            format!("components.{}", name),
            format!("components.{}", name),
            format!("js/components/{{{{model-names}}}}/{}.vue", component),
        )
        .registers_into(
            "router",
            Substitutions::new()
                .with("component", component.clone())
                .with(
                    "import_path",
                    format!("./components/{{{{model-names}}}}/{}.vue", component),
                )
                .with("route_path", route_path)
                .with("route_name", format!("{{{{model-names}}}}.{}", name)),
        )
    };

    base.extend(VUE_THEME)
        .with_templates(templates)
        .with_compiler(CompilerKind::Form, vue::form())
        .with_compiler(CompilerKind::FormState, vue::form_state())
        .with_compiler(CompilerKind::TableHead, vue::table_head())
        .with_compiler(CompilerKind::TableRow, vue::table_row())
        .with_compiler(CompilerKind::Detail, vue::detail())
        .without_artifact("views.index")
        .without_artifact("views.show")
        .without_artifact("views.create")
        .without_artifact("views.edit")
        .with_artifact(
            component("index", "Index", "/{{model-names}}")
                .with_section(Section::new("TABLE_HEAD", CompilerKind::TableHead))
                .with_section(Section::new("TABLE_ROW", CompilerKind::TableRow)),
        )
        .with_artifact(
            component("show", "Show", "/{{model-names}}/:id").with_section(
                Section::new("CONTENT", CompilerKind::Detail).on_empty("<!-- no fields -->"),
            ),
        )
        .with_artifact(
            component("create", "Create", "/{{model-names}}/create")
                .with_section(
                    Section::new("CONTENT", CompilerKind::Form).on_empty("<!-- no fields -->"),
                )
                .with_section(Section::new("FORM_STATE", CompilerKind::FormState)),
        )
        .with_artifact(
            component("edit", "Edit", "/{{model-names}}/:id/edit")
                .with_section(
                    Section::new("CONTENT", CompilerKind::Form).on_empty("<!-- no fields -->"),
                )
                .with_section(Section::new("FORM_STATE", CompilerKind::FormState)),
        )
        .with_aggregator(AggregatorSpec::new("router", "js/router.js", "router"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact_names(theme: &Theme) -> Vec<&str> {
        theme.artifacts().iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_default_theme_artifact_order() {
        let theme = default_theme();
        assert_eq!(
            artifact_names(&theme),
            vec![
                "migration",
                "model",
                "request",
                "controller",
                "views.index",
                "views.show",
                "views.create",
                "views.edit"
            ]
        );
    }

    #[test]
    fn test_default_theme_resolves_every_artifact_template() {
        let theme = default_theme();
        for artifact in theme.artifacts() {
            assert!(theme.templates().contains(&artifact.template), "{}", artifact.template);
            for section in &artifact.sections {
                assert!(theme.compiler(section.compiler).is_ok());
            }
        }
    }

    #[test]
    fn test_vue_theme_overrides_and_inherits() {
        let base = default_theme();
        let vue = vue_theme(&base);

        assert_eq!(
            artifact_names(&vue),
            vec![
                "migration",
                "model",
                "request",
                "controller",
                "components.index",
                "components.show",
                "components.create",
                "components.edit"
            ]
        );
        assert!(vue.templates().resolve("controller").unwrap().contains("response()->json"));
        assert!(!base.templates().resolve("controller").unwrap().contains("response()->json"));
        assert_eq!(
            vue.templates().resolve("migration").unwrap(),
            base.templates().resolve("migration").unwrap()
        );
        assert!(vue.compiler(CompilerKind::FormState).is_ok());
        assert!(base.compiler(CompilerKind::FormState).is_err());
        assert_eq!(vue.aggregators().len(), 2);
        for artifact in vue.artifacts() {
            assert!(vue.templates().contains(&artifact.template), "{}", artifact.template);
        }
    }

    #[test]
    fn test_component_registration_values() {
        let vue = vue_theme(&default_theme());
        let registration = vue
            .artifact("components.edit")
            .and_then(|a| a.registration.clone())
            .unwrap();
        assert_eq!(registration.aggregator, "router");
        assert_eq!(registration.values.get("component"), Some("{{ModelName}}Edit"));
        assert_eq!(
            registration.values.get("route_path"),
            Some("/{{model-names}}/:id/edit")
        );
    }

    #[test]
    fn test_with_artifact_replaces_in_place() {
        let theme = default_theme().with_artifact(ArtifactSpec::new(
            "model",
            "model",
            "src/{{ModelName}}.php",
        ));
        assert_eq!(theme.artifacts()[1].path, "src/{{ModelName}}.php");
        assert_eq!(theme.artifacts().len(), 8);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ThemeRegistry::new();
        assert_eq!(registry.names(), vec!["default", "vue"]);
        assert_eq!(registry.get("vue").unwrap().name(), "vue");
        assert!(matches!(
            registry.get("react"),
            Err(GenerationError::ThemeNotFound(name)) if name == "react"
        ));
    }

    #[test]
    fn test_missing_compiler() {
        let err = Theme::new("bare").compiler(CompilerKind::Form).unwrap_err();
        assert_eq!(err.to_string(), "Theme 'bare' has no form compiler");
    }
}
