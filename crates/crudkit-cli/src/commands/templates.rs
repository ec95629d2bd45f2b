// Inspect the templates a theme resolves

use std::path::PathBuf;

use crudkit_generation::{GenerationError, ThemeRegistry};

use super::Command;
use crate::{error::CliResult, output::OutputStyle};

/// List a theme's template names, or print one template
pub struct TemplatesCommand {
    pub theme: String,
    pub show: Option<String>,
    pub templates_dir: Option<PathBuf>,
}

impl TemplatesCommand {
    pub fn new(theme: impl Into<String>, show: Option<String>) -> Self {
        Self {
            theme: theme.into(),
            show,
            templates_dir: None,
        }
    }

    pub fn with_templates_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.templates_dir = dir;
        self
    }

    /// Template names, or the requested template's content
    pub fn render(&self) -> CliResult<String> {
        let registry = ThemeRegistry::new();
        let mut theme = registry.get(&self.theme)?.clone();
        if let Some(dir) = &self.templates_dir {
            theme = theme.with_templates_dir(dir.clone());
        }

        match &self.show {
            Some(name) => Ok(theme
                .templates()
                .resolve(name)
                .map_err(GenerationError::from)?),
            None => Ok(theme.templates().names().join("\n")),
        }
    }
}

impl Command for TemplatesCommand {
    fn execute(&self) -> CliResult<()> {
        let rendered = self.render()?;
        if self.show.is_some() {
            print!("{}", rendered);
            return Ok(());
        }

        let style = OutputStyle::default();
        println!("{}", style.header(&format!("Templates of theme '{}'", self.theme)));
        for name in rendered.lines() {
            println!("{}", style.list_item(name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crudkit_generation::TemplateError;
    use tempfile::TempDir;

    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_lists_template_names() {
        let names = TemplatesCommand::new("default", None).render().unwrap();
        let names: Vec<&str> = names.lines().collect();
        assert!(names.contains(&"migration"));
        assert!(names.contains(&"views.create"));
        assert!(names.contains(&"routes.web.route"));
    }

    #[test]
    fn test_child_theme_inherits_parent_templates() {
        let names = TemplatesCommand::new("vue", None).render().unwrap();
        assert!(names.lines().any(|n| n == "migration"));
        assert!(names.lines().any(|n| n == "components.create"));
    }

    #[test]
    fn test_show_prints_one_template() {
        let content = TemplatesCommand::new("default", Some("routes.web.route".into()))
            .render()
            .unwrap();
        assert!(content.contains("Route::resource('{{model-names}}'"));
    }

    #[test]
    fn test_show_prefers_override_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("model.stub"), "custom model\n").unwrap();

        let content = TemplatesCommand::new("default", Some("model".into()))
            .with_templates_dir(Some(temp.path().to_path_buf()))
            .render()
            .unwrap();
        assert_eq!(content, "custom model\n");
    }

    #[test]
    fn test_show_unknown_template() {
        let err = TemplatesCommand::new("default", Some("nope".into()))
            .render()
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Generation(GenerationError::Template(TemplateError::NotFound { .. }))
        ));
    }
}
