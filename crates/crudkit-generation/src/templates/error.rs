//! Error types for the template layer

use thiserror::Error;

/// Errors raised while resolving or filling templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template name is absent from every layer of the registry
    #[error("Template not found: {name} (theme '{theme}')")]
    NotFound {
        /// Requested template name
        name: String,
        /// Theme whose registry was searched
        theme: String,
    },

    /// Inline tokens survived every known substitution
    #[error("Unresolved placeholders in {template}: {}", .tokens.join(", "))]
    Unresolved {
        /// Template (or artifact) the tokens were found in
        template: String,
        /// The leftover tokens, in order of appearance
        tokens: Vec<String>,
    },

    /// A template override file could not be read
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
