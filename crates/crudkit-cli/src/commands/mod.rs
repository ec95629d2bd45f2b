// Command handlers for the crudkit CLI

pub mod config;
pub mod generate;
pub mod templates;
pub mod themes;

pub use config::ConfigCommand;
pub use generate::{GenerateCommand, GenerateOutcome};
pub use templates::TemplatesCommand;
pub use themes::ThemesCommand;

use crate::error::CliResult;

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self) -> CliResult<()>;
}
