//! Template layer for scaffold generation
//!
//! Provides placeholder substitution and theme-scoped template lookup.

pub mod error;
pub mod registry;
pub mod substitution;

// Re-export public API
pub use error::TemplateError;
pub use registry::{DirectorySource, EmbeddedSource, TemplateRegistry, TemplateSource};
pub use substitution::{
    line_tags, remove_unset_tags, substitute, substitute_tag, unresolved_tokens, Substitutions,
};
