// Scaffold every artifact of a theme for one entity

use std::path::PathBuf;

use crudkit_generation::{
    parse_fields, ConventionalPathResolver, Crud, EnglishNameDeriver, EntityDefinition,
    FileSystem, GenerationOptions, GenerationRun, LocalFileSystem, NameDeriver, RunReport,
    ThemeRegistry,
};
use tracing::debug;

use super::Command;
use crate::{
    config::CrudkitConfig,
    error::{CliError, CliResult},
    output::OutputStyle,
};

/// What a generate invocation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Dry run: the actions a real run would take
    Planned(Vec<String>),
    /// Everything was written
    Completed(RunReport),
}

/// Generate the CRUD scaffold for one entity
pub struct GenerateCommand {
    pub name: Option<String>,
    pub fields: Vec<String>,
    pub from: Option<PathBuf>,
    pub theme: Option<String>,
    pub force: bool,
    pub dry_run: bool,
    pub json: bool,
    pub config: CrudkitConfig,
}

impl GenerateCommand {
    pub fn new(name: Option<String>, config: CrudkitConfig) -> Self {
        Self {
            name,
            fields: Vec::new(),
            from: None,
            theme: None,
            force: false,
            dry_run: false,
            json: false,
            config,
        }
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_definition(mut self, from: Option<PathBuf>) -> Self {
        self.from = from;
        self
    }

    pub fn with_theme(mut self, theme: Option<String>) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Run against `fs` without printing anything
    pub fn run(&self, fs: &dyn FileSystem) -> CliResult<GenerateOutcome> {
        let definition = self
            .from
            .as_deref()
            .map(EntityDefinition::from_path)
            .transpose()?;

        let name = self
            .name
            .clone()
            .or_else(|| definition.as_ref().map(|d| d.name.clone()))
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| CliError::InvalidArgument {
                message: "an entity name is required, either as NAME or in the --from file"
                    .to_string(),
            })?;

        // Definition file fields first, then --field shorthands
        let mut entries = match &definition {
            Some(definition) => definition.entries()?,
            None => Vec::new(),
        };
        entries.extend(parse_fields(&self.fields)?);

        // --theme, then the definition file, then configuration
        let theme_name = self
            .theme
            .clone()
            .or_else(|| definition.as_ref().and_then(|d| d.theme.clone()))
            .unwrap_or_else(|| self.config.theme.clone());

        let registry = ThemeRegistry::new();
        let mut theme = registry.get(&theme_name)?.clone();
        if let Some(dir) = &self.config.templates_dir {
            theme = theme.with_templates_dir(dir.clone());
        }

        let crud = Crud::new(
            EnglishNameDeriver.derive(&name),
            entries,
            GenerationOptions {
                force: self.force,
                strict: self.config.strict,
            },
        );
        debug!(
            "Generating {} with theme {} into {}",
            crud.names().studly_singular,
            theme.name(),
            self.config.output_dir.display()
        );

        let resolver = ConventionalPathResolver::new(&self.config.output_dir);
        let run = GenerationRun::new(&theme, &crud, &resolver, fs);

        if self.dry_run {
            Ok(GenerateOutcome::Planned(run.plan()?))
        } else {
            Ok(GenerateOutcome::Completed(run.execute()?))
        }
    }

    fn print(&self, outcome: &GenerateOutcome) -> CliResult<()> {
        let style = OutputStyle::default();

        match outcome {
            GenerateOutcome::Planned(actions) if self.json => {
                let json = serde_json::json!({ "dry_run": true, "actions": actions });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            GenerateOutcome::Completed(report) if self.json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            GenerateOutcome::Planned(actions) => {
                println!("{}", style.header("Dry run, nothing written"));
                for action in actions {
                    println!("{}", style.planned(action));
                }
            }
            GenerateOutcome::Completed(report) => {
                for line in &report.outcomes {
                    println!("{}", style.success(line));
                }
                if let Some(message) = report.message() {
                    for line in message.lines() {
                        println!("{}", style.info(line));
                    }
                }
            }
        }

        Ok(())
    }
}

impl Command for GenerateCommand {
    fn execute(&self) -> CliResult<()> {
        let outcome = self.run(&LocalFileSystem)?;
        self.print(&outcome)
    }
}
