//! Generation run orchestration
//!
//! A run builds every artifact of a theme for one entity. Nothing is written
//! unless every builder may proceed and every artifact and registration
//! rendered successfully.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    aggregator::{AggregateOutcome, IncrementalAggregator, PreparedAggregate},
    builder::{Builder, Proceed},
    error::{GenerationError, Result},
    fs::FileSystem,
    models::Crud,
    paths::PathResolver,
    theme::Theme,
};

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Theme the run used
    pub theme: String,
    /// One outcome line per builder, in build order
    pub outcomes: Vec<String>,
    /// Shared files that received registrations
    pub registrations: Vec<Registered>,
}

/// One flushed aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registered {
    /// Shared file, relative to the output root
    pub path: String,
    /// How the file was changed
    pub outcome: AggregateOutcome,
}

impl RunReport {
    /// Final message for the host, one line per flushed aggregator
    pub fn message(&self) -> Option<String> {
        if self.registrations.is_empty() {
            return None;
        }
        Some(
            self.registrations
                .iter()
                .map(|r| format!("components registered into {}", r.path))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// One generation run of a theme for an entity
pub struct GenerationRun<'a> {
    theme: &'a Theme,
    crud: &'a Crud,
    resolver: &'a dyn PathResolver,
    fs: &'a dyn FileSystem,
}

impl<'a> GenerationRun<'a> {
    /// Create a run
    pub fn new(
        theme: &'a Theme,
        crud: &'a Crud,
        resolver: &'a dyn PathResolver,
        fs: &'a dyn FileSystem,
    ) -> Self {
        Self {
            theme,
            crud,
            resolver,
            fs,
        }
    }

    /// One builder per theme artifact, in declared order
    pub fn builders(&self) -> Vec<Builder<'a>> {
        self.theme
            .artifacts()
            .iter()
            .map(|artifact| Builder::new(artifact, self.theme, self.crud, self.resolver, self.fs))
            .collect()
    }

    /// Fail with every blocked destination at once
    fn preflight(builders: &[Builder<'_>]) -> Result<()> {
        let blocked: Vec<String> = builders
            .iter()
            .filter_map(|builder| match builder.may_proceed() {
                Proceed::Ok => None,
                Proceed::Blocked(_) => Some(builder.display_path().to_string()),
            })
            .collect();

        if blocked.is_empty() {
            Ok(())
        } else {
            Err(GenerationError::DestinationBlocked { paths: blocked })
        }
    }

    fn aggregators(&self) -> Vec<IncrementalAggregator> {
        self.theme
            .aggregators()
            .iter()
            .map(|spec| {
                let destination = self.resolver.resolve(&spec.path, self.crud.names());
                let display = self.resolver.display(&destination);
                IncrementalAggregator::new(spec, self.theme.templates(), destination, display)
                    .strict(self.crud.options().strict)
            })
            .collect()
    }

    /// Planned actions, without rendering or writing anything
    pub fn plan(&self) -> Result<Vec<String>> {
        let builders = self.builders();
        Self::preflight(&builders)?;

        let mut lines: Vec<String> = builders
            .iter()
            .map(Builder::describe_planned_action)
            .collect();

        let targets: Vec<&str> = builders
            .iter()
            .filter_map(|b| b.artifact().registration.as_ref())
            .map(|r| r.aggregator.as_str())
            .collect();
        for aggregator in self.aggregators() {
            if targets.contains(&aggregator.id()) {
                lines.push(format!(
                    "Will register components into {}",
                    aggregator.display_path()
                ));
            }
        }

        Ok(lines)
    }

    /// Preflight, render everything in memory, then write
    pub fn execute(&self) -> Result<RunReport> {
        let mut builders = self.builders();
        Self::preflight(&builders)?;

        let mut aggregators = self.aggregators();
        let index: HashMap<String, usize> = aggregators
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id().to_string(), i))
            .collect();

        for builder in &mut builders {
            builder.prepare()?;
            if let Some((id, values)) = builder.registration() {
                let slot = index.get(id).copied().ok_or_else(|| {
                    GenerationError::Definition(format!(
                        "artifact '{}' registers into unknown aggregator '{}'",
                        builder.artifact().name,
                        id
                    ))
                })?;
                aggregators[slot].register(&values)?;
            }
        }

        let prepared: Vec<PreparedAggregate> = aggregators
            .iter()
            .filter(|a| !a.is_empty())
            .map(IncrementalAggregator::prepare)
            .collect::<Result<_>>()?;
        debug!(
            "Prepared {} artifact(s) and {} registration file(s)",
            builders.len(),
            prepared.len()
        );

        let mut outcomes = Vec::with_capacity(builders.len());
        for builder in &mut builders {
            builder.commit(self.fs)?;
            outcomes.push(builder.describe_outcome());
        }

        let mut registrations = Vec::with_capacity(prepared.len());
        for aggregate in &prepared {
            let outcome = aggregate.flush(self.fs)?;
            registrations.push(Registered {
                path: aggregate.display_path().to_string(),
                outcome,
            });
        }

        info!(
            "Generated {} artifact(s) with theme {}",
            outcomes.len(),
            self.theme.name()
        );

        Ok(RunReport {
            theme: self.theme.name().to_string(),
            outcomes,
            registrations,
        })
    }
}
