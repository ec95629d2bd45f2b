//! Per-artifact build orchestration
//!
//! A [`Builder`] owns one destination. It checks the destination on
//! construction, renders the complete text in memory and writes it once.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    compilers::RenderContext,
    error::Result,
    fs::FileSystem,
    models::Crud,
    paths::PathResolver,
    templates::{line_tags, substitute_tag, unresolved_tokens, Substitutions, TemplateError},
    theme::{ArtifactSpec, Theme},
};

/// Lifecycle of a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Destination checked, nothing written
    Pending,
    /// The single write was performed
    Done,
}

/// Whether a builder may write its destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proceed {
    /// Writing is allowed
    Ok,
    /// Writing would clobber an existing file
    Blocked(String),
}

impl Proceed {
    /// Whether writing is allowed
    pub fn is_ok(&self) -> bool {
        matches!(self, Proceed::Ok)
    }
}

impl fmt::Display for Proceed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proceed::Ok => f.write_str("ok"),
            Proceed::Blocked(reason) => f.write_str(reason),
        }
    }
}

/// Builds one artifact of a theme for one entity
pub struct Builder<'a> {
    artifact: &'a ArtifactSpec,
    theme: &'a Theme,
    crud: &'a Crud,
    destination: PathBuf,
    display: String,
    existed: bool,
    state: BuilderState,
    rendered: Option<String>,
}

impl<'a> Builder<'a> {
    /// Resolve the destination and record whether it already exists
    pub fn new(
        artifact: &'a ArtifactSpec,
        theme: &'a Theme,
        crud: &'a Crud,
        resolver: &dyn PathResolver,
        fs: &dyn FileSystem,
    ) -> Self {
        let destination = resolver.resolve(&artifact.path, crud.names());
        let display_path = resolver.display(&destination);
        let existed = fs.exists(&destination);
        debug!(
            "Builder {} targets {} (exists: {})",
            artifact.name, display_path, existed
        );

        Self {
            artifact,
            theme,
            crud,
            destination,
            display: display_path,
            existed,
            state: BuilderState::Pending,
            rendered: None,
        }
    }

    /// Artifact this builder produces
    pub fn artifact(&self) -> &ArtifactSpec {
        self.artifact
    }

    /// Absolute destination
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Destination relative to the output root
    pub fn display_path(&self) -> &str {
        &self.display
    }

    /// Whether the destination existed when the builder was created
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Current state
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Blocked when the destination exists and overwriting was not requested
    pub fn may_proceed(&self) -> Proceed {
        if self.existed && !self.crud.options().force {
            Proceed::Blocked(format!("{} already exists", self.display))
        } else {
            Proceed::Ok
        }
    }

    /// Summary of what [`Builder::execute`] will do
    pub fn describe_planned_action(&self) -> String {
        if self.existed {
            format!("Will overwrite {}", self.display)
        } else {
            format!("Will create {}", self.display)
        }
    }

    /// Summary of what was done
    pub fn describe_outcome(&self) -> String {
        match (self.state, self.existed) {
            (BuilderState::Pending, _) => format!("Not written {}", self.display),
            (BuilderState::Done, true) => format!("Overwrote {}", self.display),
            (BuilderState::Done, false) => format!("Created {}", self.display),
        }
    }

    /// Render the final text without touching the file system
    ///
    /// Names are resolved in the template before any section is filled, so
    /// user values inside compiled sections are never read as tokens.
    pub fn render(&self) -> Result<String> {
        let template_name = &self.artifact.template;
        let template = self.theme.templates().resolve(template_name)?;
        let mut text = self.crud.substitutions().apply(&template);

        if self.crud.options().strict {
            let tokens = unresolved_tokens(&text);
            if !tokens.is_empty() {
                return Err(TemplateError::Unresolved {
                    template: template_name.clone(),
                    tokens,
                }
                .into());
            }
        }

        for tag in line_tags(&text) {
            if !self.artifact.sections.iter().any(|s| s.tag == tag) {
                text = substitute_tag(&text, &tag, "");
            }
        }

        let context = RenderContext::new(self.crud.names());
        for section in &self.artifact.sections {
            let compiler = self.theme.compiler(section.compiler)?;
            let body = compiler.compile(self.crud.entries(), &context, &section.on_empty);
            text = substitute_tag(&text, &section.tag, &body);
        }

        Ok(text)
    }

    /// Render and keep the text for [`Builder::commit`]
    pub fn prepare(&mut self) -> Result<()> {
        if self.rendered.is_none() {
            self.rendered = Some(self.render()?);
        }
        Ok(())
    }

    /// The prepared text, if any
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref()
    }

    /// Write the prepared text in a single call
    pub fn commit(&mut self, fs: &dyn FileSystem) -> Result<()> {
        self.prepare()?;
        let text = self.rendered.as_deref().unwrap_or_default();
        fs.write(&self.destination, text)?;
        self.state = BuilderState::Done;
        info!("{}", self.describe_outcome());
        Ok(())
    }

    /// Render and write, overwriting unconditionally
    pub fn execute(&mut self, fs: &dyn FileSystem) -> Result<()> {
        self.prepare()?;
        self.commit(fs)
    }

    /// Fragment values to register into the artifact's aggregator, names resolved
    pub fn registration(&self) -> Option<(&str, Substitutions)> {
        self.artifact.registration.as_ref().map(|registration| {
            let names = self.crud.substitutions();
            let mut values = Substitutions::new();
            for (key, value) in registration.values.iter() {
                values.insert(key, names.apply(value));
            }
            values.extend(&names);
            (registration.aggregator.as_str(), values)
        })
    }
}

impl fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("artifact", &self.artifact.name)
            .field("theme", &self.theme.name())
            .field("destination", &self.display)
            .field("existed", &self.existed)
            .field("state", &self.state)
            .finish()
    }
}
