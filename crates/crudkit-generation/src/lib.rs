#![warn(missing_docs)]

//! Template compilation engine for crudkit
//!
//! Dispatches entity entries to per-artifact rendering rules, fills named
//! placeholders in theme templates and writes every artifact of a theme in a
//! single all-or-nothing run, registering components into shared files along
//! the way.

pub mod aggregator;
pub mod builder;
pub mod compilers;
pub mod definition;
pub mod error;
pub mod fs;
pub mod generation_manager;
pub mod models;
pub mod naming;
pub mod paths;
pub mod signatures;
pub mod templates;
pub mod theme;

// Re-export public API
pub use aggregator::{AggregateOutcome, IncrementalAggregator, PreparedAggregate};
pub use builder::{Builder, BuilderState, Proceed};
pub use compilers::{Compiler, CompilerKind, RenderContext, Rule};
pub use definition::{parse_field, parse_fields, DefinitionFormat, EntityDefinition, FieldDefinition};
pub use error::{GenerationError, Result};
pub use fs::{FileSystem, LocalFileSystem, MemoryFileSystem};
pub use generation_manager::{GenerationRun, Registered, RunReport};
pub use models::{Crud, Entry, Fragment, GenerationOptions, OptionValue};
pub use naming::{EnglishNameDeriver, NameDeriver, Names};
pub use paths::{ConventionalPathResolver, PathResolver};
pub use signatures::{ArgumentShape, Command, CommandKind, NameRule, Signature};
pub use templates::{
    DirectorySource, EmbeddedSource, Substitutions, TemplateError, TemplateRegistry,
    TemplateSource,
};
pub use theme::{
    default_theme, vue_theme, AggregatorSpec, ArtifactSpec, Registration, Section, Theme,
    ThemeRegistry, DEFAULT_THEME, ROUTES_MARKER, VUE_THEME,
};
