//! Marker-based registration into shared files
//!
//! Registrations are additive: registering the same entity twice adds its
//! fragments twice. The marker is a plain comment in a hand-editable file, so
//! a file whose marker was removed falls back to appending a whole skeleton.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    fs::FileSystem,
    templates::{
        remove_unset_tags, substitute_tag, unresolved_tokens, Substitutions, TemplateError,
        TemplateRegistry,
    },
    theme::AggregatorSpec,
};

/// How a flush changed the shared file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOutcome {
    /// The file did not exist and was created from the skeleton
    Created,
    /// The rendered body replaced the marker
    Injected,
    /// The marker was missing and the skeleton was appended
    Appended,
}

/// Accumulates registration fragments for one shared file during a run
#[derive(Debug, Clone)]
pub struct IncrementalAggregator {
    spec: AggregatorSpec,
    templates: TemplateRegistry,
    destination: PathBuf,
    display: String,
    strict: bool,
    imports: Vec<String>,
    routes: Vec<String>,
}

impl IncrementalAggregator {
    /// Create an empty aggregator writing to `destination`
    pub fn new(
        spec: &AggregatorSpec,
        templates: &TemplateRegistry,
        destination: PathBuf,
        display: impl Into<String>,
    ) -> Self {
        Self {
            spec: spec.clone(),
            templates: templates.clone(),
            destination,
            display: display.into(),
            strict: true,
            imports: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Toggle the unresolved-token check on rendered fragments
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Aggregator id
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// Destination of the shared file
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Destination as shown to users
    pub fn display_path(&self) -> &str {
        &self.display
    }

    /// Whether nothing was registered yet
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.routes.is_empty()
    }

    /// Render the import and route fragments for one registration
    pub fn register(&mut self, values: &Substitutions) -> Result<()> {
        let import = self.render_fragment(&self.spec.import, values)?;
        let route = self.render_fragment(&self.spec.route, values)?;
        debug!("Registered {} into {}", route, self.display);
        self.imports.push(import);
        self.routes.push(route);
        Ok(())
    }

    fn render_fragment(&self, template: &str, values: &Substitutions) -> Result<String> {
        let text = values.apply(self.templates.resolve(template)?.trim());
        self.check(template, &text)?;
        Ok(text)
    }

    fn check(&self, template: &str, text: &str) -> Result<()> {
        let tokens = unresolved_tokens(text);
        if self.strict && !tokens.is_empty() {
            return Err(TemplateError::Unresolved {
                template: template.to_string(),
                tokens,
            }
            .into());
        }
        Ok(())
    }

    /// Render the body and skeleton in memory
    pub fn prepare(&self) -> Result<PreparedAggregate> {
        let body = self.templates.resolve(&self.spec.body)?;
        let body = substitute_tag(&body, "IMPORTS", &self.imports.join("\n"));
        let body = substitute_tag(&body, "ROUTES", &self.routes.join("\n"));
        let body = remove_unset_tags(&body).trim_end().to_string();
        self.check(&self.spec.body, &body)?;

        let skeleton = self.templates.resolve(&self.spec.skeleton)?;
        let skeleton = remove_unset_tags(&substitute_tag(&skeleton, "BODY", &body));
        self.check(&self.spec.skeleton, &skeleton)?;

        Ok(PreparedAggregate {
            destination: self.destination.clone(),
            display: self.display.clone(),
            marker: self.spec.marker.clone(),
            body,
            skeleton,
        })
    }

    /// Render and merge into the shared file in one step
    pub fn flush(&self, fs: &dyn FileSystem) -> Result<AggregateOutcome> {
        self.prepare()?.flush(fs)
    }
}

/// A fully rendered registration waiting to be merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedAggregate {
    destination: PathBuf,
    display: String,
    marker: String,
    body: String,
    skeleton: String,
}

impl PreparedAggregate {
    /// Rendered body, ending with the marker
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Rendered skeleton with the body in place
    pub fn skeleton(&self) -> &str {
        &self.skeleton
    }

    /// Destination as shown to users
    pub fn display_path(&self) -> &str {
        &self.display
    }

    /// Merge into the current contents of the shared file, if any
    pub fn merge(&self, existing: Option<&str>) -> (String, AggregateOutcome) {
        match existing {
            None => (self.skeleton.clone(), AggregateOutcome::Created),
            Some(text) => match text.find(&self.marker) {
                Some(at) => (self.inject(text, at), AggregateOutcome::Injected),
                None => (self.append(text), AggregateOutcome::Appended),
            },
        }
    }

    /// Replace the marker at byte offset `at` with the body, every body line
    /// indented to the marker's column
    fn inject(&self, text: &str, at: usize) -> String {
        let line_start = text[..at].rfind('\n').map_or(0, |i| i + 1);
        let lead = &text[line_start..at];
        let indent = if lead.trim().is_empty() { lead } else { "" };

        let body = self
            .body
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 || line.is_empty() {
                    line.to_string()
                } else {
                    format!("{}{}", indent, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!("{}{}{}", &text[..at], body, &text[at + self.marker.len()..])
    }

    fn append(&self, text: &str) -> String {
        let mut merged = text.to_string();
        if !merged.is_empty() && !merged.ends_with('\n') {
            merged.push('\n');
        }
        merged.push_str(&self.skeleton);
        merged
    }

    /// Read the shared file, merge, and write it back once
    pub fn flush(&self, fs: &dyn FileSystem) -> Result<AggregateOutcome> {
        let existing = if fs.exists(&self.destination) {
            Some(fs.read(&self.destination)?)
        } else {
            None
        };

        let (contents, outcome) = self.merge(existing.as_deref());
        if outcome == AggregateOutcome::Appended {
            warn!(
                "Marker '{}' not found in {}, appended a new skeleton",
                self.marker, self.display
            );
        }

        fs.write(&self.destination, &contents)?;
        info!("Registered components into {} ({:?})", self.display, outcome);
        Ok(outcome)
    }
}
