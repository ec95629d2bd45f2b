//! Layered configuration
//!
//! Lowest to highest: built-in defaults, the user file
//! `<config_dir>/crudkit/config.toml`, the project file `./crudkit.toml`,
//! `CRUDKIT_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{CliError, CliResult},
    logging::parse_level,
};

/// Effective crudkit settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudkitConfig {
    /// Theme used when neither a flag nor a definition file names one
    pub theme: String,
    /// Root every artifact path is resolved against
    pub output_dir: PathBuf,
    /// Directory of `.stub` files overriding theme templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Fail on placeholders left after substitution
    pub strict: bool,
    /// Log level when neither `--verbose` nor `--quiet` is given
    pub log_level: String,
}

impl Default for CrudkitConfig {
    fn default() -> Self {
        Self {
            theme: crudkit_generation::DEFAULT_THEME.to_string(),
            output_dir: PathBuf::from("."),
            templates_dir: None,
            strict: true,
            log_level: "info".to_string(),
        }
    }
}

impl CrudkitConfig {
    /// Reject values that would only fail later
    pub fn validate(&self) -> CliResult<()> {
        if self.theme.trim().is_empty() {
            return Err(CliError::Config("theme must not be empty".to_string()));
        }
        if parse_level(&self.log_level).is_none() {
            return Err(CliError::Config(format!(
                "unknown log_level '{}', expected trace, debug, info, warn or error",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub templates_dir: Option<PathBuf>,
    pub strict: Option<bool>,
    pub log_level: Option<String>,
}

/// Builds a [`CrudkitConfig`] from every layer
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    user_path: Option<PathBuf>,
    project_path: PathBuf,
    env_prefix: String,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    /// Loader for the standard locations
    pub fn new() -> Self {
        Self {
            user_path: Self::default_user_path(),
            project_path: PathBuf::from("crudkit.toml"),
            env_prefix: "CRUDKIT".to_string(),
            overrides: ConfigOverrides::default(),
        }
    }

    /// `<config_dir>/crudkit/config.toml`, when the platform has a config dir
    pub fn default_user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("crudkit").join("config.toml"))
    }

    pub fn with_user_path(mut self, path: Option<PathBuf>) -> Self {
        self.user_path = path;
        self
    }

    pub fn with_project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = path.into();
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Config files consulted, in layering order
    pub fn files(&self) -> Vec<&Path> {
        self.user_path
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(self.project_path.as_path()))
            .collect()
    }

    /// Merge every layer and validate the result
    pub fn load(&self) -> CliResult<CrudkitConfig> {
        let defaults = CrudkitConfig::default();
        let mut builder = Config::builder()
            .set_default("theme", defaults.theme)?
            .set_default("output_dir", path_value(&defaults.output_dir))?
            .set_default("strict", defaults.strict)?
            .set_default("log_level", defaults.log_level)?;

        for path in self.files() {
            debug!("Config layer {}", path.display());
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        let overrides = &self.overrides;
        let config = builder
            .add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true))
            .set_override_option("theme", overrides.theme.clone())?
            .set_override_option("output_dir", overrides.output_dir.as_deref().map(path_value))?
            .set_override_option(
                "templates_dir",
                overrides.templates_dir.as_deref().map(path_value),
            )?
            .set_override_option("strict", overrides.strict)?
            .set_override_option("log_level", overrides.log_level.clone())?
            .build()?;

        let config: CrudkitConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
