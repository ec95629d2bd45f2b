// Show the effective configuration

use std::path::PathBuf;

use super::Command;
use crate::{config::CrudkitConfig, error::CliResult, output::OutputStyle};

/// Print the merged configuration and the files it was read from
pub struct ConfigCommand {
    pub config: CrudkitConfig,
    pub files: Vec<PathBuf>,
}

impl ConfigCommand {
    pub fn new(config: CrudkitConfig, files: Vec<PathBuf>) -> Self {
        Self { config, files }
    }
}

impl Command for ConfigCommand {
    fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();

        println!("{}", style.header("crudkit configuration"));
        println!();
        print!("{}", self.config.to_toml()?);
        println!();

        for file in &self.files {
            let state = if file.is_file() { "loaded" } else { "not found" };
            println!("{}", style.info(&format!("{} ({})", file.display(), state)));
        }

        Ok(())
    }
}
