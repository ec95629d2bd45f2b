// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    commands::*,
    config::{ConfigLoader, ConfigOverrides},
    error::CliResult,
    logging::{init_logging, VerbosityLevel},
};

/// crudkit - scaffold CRUD artifacts from a field list
#[derive(Parser, Debug)]
#[command(name = "crudkit")]
#[command(bin_name = "crudkit")]
#[command(about = "Scaffold CRUD migrations, models, controllers and views")]
#[command(
    long_about = "crudkit renders every artifact of a theme for one entity.\n\nQuick start:\n  crudkit generate Post --field title:string --field published:boolean\n  crudkit generate Post --from post.yaml --theme vue\n  crudkit themes\n  crudkit templates default --show migration"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate every artifact of a theme for one entity
    #[command(visible_alias = "gen")]
    Generate {
        /// Entity name, e.g. Post or blog_post
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Field shorthand name:command(args):option, repeatable
        #[arg(short, long = "field", value_name = "FIELD")]
        fields: Vec<String>,

        /// Definition file (.yaml, .yml, .toml, .json)
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,

        /// Theme to render with
        #[arg(short, long)]
        theme: Option<String>,

        /// Output root for every artifact
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Directory of .stub files overriding theme templates
        #[arg(long, value_name = "DIR")]
        templates: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,

        /// Print planned actions without writing
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,

        /// Leave unresolved placeholders in place instead of failing
        #[arg(long)]
        no_strict: bool,
    },

    /// List available themes
    Themes,

    /// List the templates of a theme, or print one
    Templates {
        /// Theme name
        #[arg(value_name = "THEME")]
        theme: String,

        /// Print this template instead of listing names
        #[arg(long, value_name = "NAME")]
        show: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to the matching handler
    pub fn route() -> CliResult<()> {
        let cli = Cli::parse();
        Self::execute(&cli, ConfigLoader::new())
    }

    /// Flag values that take part in configuration layering
    pub fn overrides(command: &Commands) -> ConfigOverrides {
        match command {
            Commands::Generate {
                theme,
                output,
                templates,
                no_strict,
                ..
            } => ConfigOverrides {
                theme: theme.clone(),
                output_dir: output.clone(),
                templates_dir: templates.clone(),
                strict: no_strict.then_some(false),
                log_level: None,
            },
            _ => ConfigOverrides::default(),
        }
    }

    /// Load configuration, install logging, and run a parsed command
    pub fn execute(cli: &Cli, loader: ConfigLoader) -> CliResult<()> {
        let loader = loader.with_overrides(Self::overrides(&cli.command));
        let config = loader.load()?;
        init_logging(
            VerbosityLevel::from_flags(cli.verbose, cli.quiet),
            &config.log_level,
        );

        match &cli.command {
            Commands::Generate {
                name,
                fields,
                from,
                theme,
                force,
                dry_run,
                json,
                ..
            } => {
                let cmd = GenerateCommand::new(name.clone(), config)
                    .with_fields(fields.clone())
                    .with_definition(from.clone())
                    .with_theme(theme.clone())
                    .with_force(*force)
                    .with_dry_run(*dry_run)
                    .with_json(*json);
                cmd.execute()
            }
            Commands::Themes => {
                let cmd = ThemesCommand::new(config.theme);
                cmd.execute()
            }
            Commands::Templates { theme, show } => {
                let cmd = TemplatesCommand::new(theme.clone(), show.clone())
                    .with_templates_dir(config.templates_dir);
                cmd.execute()
            }
            Commands::Config => {
                let files = loader.files().into_iter().map(PathBuf::from).collect();
                let cmd = ConfigCommand::new(config, files);
                cmd.execute()
            }
        }
    }
}
