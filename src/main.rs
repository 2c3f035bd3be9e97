use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use settings_resolver::commands::validators;
use settings_resolver::{commands::*, config::Settings, logging, resolve::PluginPrecedence};

#[derive(Parser)]
#[command(name = "settings")]
#[command(about = "Inspect and validate build settings files")]
#[command(version)]
struct Cli {
    /// Settings file (default: settings.gradle.kts or settings.gradle in the current directory)
    #[arg(short, long, global = true)]
    settings: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the project name, modules, policy and repositories
    Show {
        /// Output in JSON format for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Enforce the repositories mode on every included module
    Check,

    /// Show which plugin repository is expected to serve a plugin
    Plugin {
        /// Plugin id, e.g. com.android.application
        plugin_id: String,

        /// How version pins affect the lookup (pinned-prefer-portal or declaration-order)
        #[arg(long, default_value = "pinned-prefer-portal")]
        precedence: PluginPrecedence,
    },

    /// Show which dependency repository is expected to serve a library
    Dependency {
        /// Coordinate in group:artifact[:version] form
        coordinate: String,
    },
}

fn load_settings(path: &Option<String>) -> Result<Settings> {
    validators::validate_settings_path(path)?;
    let settings = match path {
        Some(path) => {
            Settings::load(path).with_context(|| format!("Failed to load settings from {path}"))?
        }
        None => Settings::discover(".").context("Failed to load settings")?,
    };
    Ok(settings)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let command: Box<dyn Command> = match cli.command {
        Commands::Show { json } => Box::new(ShowCommand { json }),
        Commands::Check => Box::new(CheckCommand),
        Commands::Plugin {
            plugin_id,
            precedence,
        } => {
            validators::validate_lookup_argument("plugin id", &plugin_id)?;
            Box::new(PluginCommand {
                plugin_id,
                precedence,
            })
        }
        Commands::Dependency { coordinate } => {
            validators::validate_lookup_argument("coordinate", &coordinate)?;
            Box::new(DependencyCommand { coordinate })
        }
    };

    let context = CommandContext {
        settings: load_settings(&cli.settings)?,
    };
    command.execute(&context)
}
