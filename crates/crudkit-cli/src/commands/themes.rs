// List the built-in themes

use crudkit_generation::ThemeRegistry;

use super::Command;
use crate::{error::CliResult, output::OutputStyle};

/// List every theme the registry resolves
pub struct ThemesCommand {
    registry: ThemeRegistry,
    configured: String,
}

impl ThemesCommand {
    pub fn new(configured: impl Into<String>) -> Self {
        Self {
            registry: ThemeRegistry::new(),
            configured: configured.into(),
        }
    }

    /// One `(name, summary)` pair per theme, sorted by name
    pub fn summaries(&self) -> CliResult<Vec<(String, String)>> {
        self.registry
            .names()
            .into_iter()
            .map(|name| {
                let theme = self.registry.get(&name)?;
                let shared: Vec<&str> = theme
                    .aggregators()
                    .iter()
                    .map(|a| a.path.as_str())
                    .collect();
                let mut summary = format!("{} artifacts", theme.artifacts().len());
                if !shared.is_empty() {
                    summary.push_str(&format!(", registers into {}", shared.join(", ")));
                }
                if name == self.configured {
                    summary.push_str(" (configured)");
                }
                Ok((name, summary))
            })
            .collect()
    }
}

impl Command for ThemesCommand {
    fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        println!("{}", style.header("Themes"));
        for (name, summary) in self.summaries()? {
            println!("{}", style.key_value(&name, &summary));
        }
        Ok(())
    }
}
