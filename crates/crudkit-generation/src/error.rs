//! Error types for scaffold generation

use std::path::PathBuf;

use thiserror::Error;

use crate::templates::TemplateError;

/// Errors that can occur while compiling and writing scaffold artifacts
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Command tag is not part of the known signature set
    #[error("Unknown command: {command}")]
    UnknownCommand {
        /// The tag that failed to resolve
        command: String,
    },

    /// Entry does not satisfy its command's signature
    #[error("Invalid entry '{command}': {message}")]
    InvalidEntry {
        /// Command tag of the offending entry
        command: String,
        /// What was wrong with it
        message: String,
    },

    /// Template lookup or substitution failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// One or more destinations exist and overwriting was not authorized
    #[error("Destination blocked:\n{}", .paths.iter().map(|p| format!("  {} already exists", p)).collect::<Vec<_>>().join("\n"))]
    DestinationBlocked {
        /// Relative paths of every blocked destination
        paths: Vec<String>,
    },

    /// Writing an artifact failed
    #[error("Write failed for {}: {source}", path.display())]
    WriteFailure {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Reading an existing file failed
    #[error("Read failed for {}: {source}", path.display())]
    ReadFailure {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Theme has no compiler registered for an artifact section
    #[error("Theme '{theme}' has no {compiler} compiler")]
    MissingCompiler {
        /// Theme name
        theme: String,
        /// Compiler kind that was requested
        compiler: String,
    },

    /// Theme name is not registered
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),

    /// Entity definition could not be interpreted
    #[error("Definition error: {0}")]
    Definition(String),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_blocked_lists_every_path() {
        let err = GenerationError::DestinationBlocked {
            paths: vec![
                "views/posts/create.blade.php".to_string(),
                "app/Models/Post.php".to_string(),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("views/posts/create.blade.php already exists"));
        assert!(message.contains("app/Models/Post.php already exists"));
    }

    #[test]
    fn test_template_error_is_transparent() {
        let err: GenerationError = TemplateError::NotFound {
            name: "views.create".to_string(),
            theme: "default".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Template not found: views.create (theme 'default')"
        );
    }
}
