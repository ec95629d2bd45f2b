// CLI error types

use crudkit_generation::{GenerationError, TemplateError};
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<config::ConfigError> for CliError {
    fn from(e: config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(e: toml::ser::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'crudkit help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(msg) => {
                format!(
                    "Configuration error: {}\n\nRun 'crudkit config' to check your configuration.",
                    msg
                )
            }
            CliError::Generation(e) => Self::generation_message(e),
            CliError::Output(msg) => format!("Could not render output: {}", msg),
        }
    }

    fn generation_message(e: &GenerationError) -> String {
        match e {
            GenerationError::DestinationBlocked { .. } => {
                format!("{}\n\nRe-run with --force to overwrite.", e)
            }
            GenerationError::ThemeNotFound(_) => {
                format!("{}\n\nRun 'crudkit themes' to list available themes.", e)
            }
            GenerationError::UnknownCommand { .. } | GenerationError::InvalidEntry { .. } => {
                format!(
                    "{}\n\nFields are written as name:command(args):option, e.g. title:string(150):nullable",
                    e
                )
            }
            GenerationError::Template(TemplateError::NotFound { theme, .. }) => {
                format!(
                    "{}\n\nRun 'crudkit templates {}' to list the templates it resolves.",
                    e, theme
                )
            }
            _ => format!("Generation failed: {}", e),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
