//! # FormForge CLI
//!
//! Command-line front end for form schema files: create, inspect, validate,
//! and edit layouts with the same drop handlers the canvas uses.

pub mod commands;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use formforge_ir::EngineConfig;
use std::path::PathBuf;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = "formforge";

#[derive(Debug, Parser)]
#[command(name = "formforge", version, about = "Form layout schema tool")]
pub struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH", env = "FORMFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new form schema file
    New {
        /// Form name
        name: String,

        /// Output file (defaults to the form name with the schema extension)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[arg(long)]
        description: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a schema file against the engine rules
    Validate {
        file: PathBuf,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Show summary statistics of a schema file
    Info { file: PathBuf },

    /// Print the layout tree
    Tree { file: PathBuf },

    /// Print the effective engine configuration, or write it to a file
    Config {
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// List the sidebar palette
    Palette,

    /// Drop a palette item or an existing node onto a target
    Drop {
        file: PathBuf,

        /// Palette key of the item to create
        #[arg(long, conflicts_with = "node", required_unless_present = "node")]
        palette: Option<String>,

        /// Id of an existing node to move
        #[arg(long)]
        node: Option<String>,

        /// Legacy path ("0-1-2") or JSON drop zone
        #[arg(long)]
        target: String,

        /// Only report whether the drop would be accepted
        #[arg(long)]
        check: bool,
    },

    /// Remove a node and its component definitions
    Trash { file: PathBuf, id: String },
}

impl Cli {
    /// Parse the process arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Engine configuration from `--config`, or the built-in defaults
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        match &self.config {
            Some(path) => {
                tracing::info!("Loading engine config from {}", path.display());
                Ok(EngineConfig::load(path)?)
            }
            None => Ok(EngineConfig::default()),
        }
    }
}

/// Run a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.engine_config()?;

    match cli.command {
        Commands::New {
            name,
            output,
            description,
            force,
        } => commands::new_schema(&name, output, description, force),
        Commands::Validate { file, strict } => commands::validate(&file, &config, strict),
        Commands::Info { file } => commands::info(&file),
        Commands::Tree { file } => commands::tree(&file),
        Commands::Config { output } => commands::config(&config, output),
        Commands::Palette => commands::palette(),
        Commands::Drop {
            file,
            palette,
            node,
            target,
            check,
        } => {
            let source = match (palette, node) {
                (Some(key), _) => commands::DropSource::Palette(key),
                (None, Some(id)) => commands::DropSource::Node(id),
                (None, None) => anyhow::bail!("either --palette or --node is required"),
            };
            commands::drop_item(&file, &config, source, &target, check)
        }
        Commands::Trash { file, id } => commands::trash(&file, &config, &id),
    }
}
