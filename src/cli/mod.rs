//! Command-line adapter for recipe-index
//!
//! Thin layer over `core/`: loads configuration, applies flag
//! overrides, runs the indexer and prints the outcome.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recipe-index - full-text index builder for recipe collections
///
/// Scans a directory of plain-text and Word documents and rebuilds a
/// Tantivy index from their contents.
#[derive(Parser, Debug)]
#[command(name = "recipe-index")]
#[command(author = "blackbeanbag")]
#[command(version)]
#[command(about = "Build a full-text index from a document directory", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Log line format (logs go to stderr)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Configuration file (overrides RECIPE_INDEX_CONFIG and the XDG config file)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Format of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the index from a document directory
    Index(commands::IndexArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  recipe-index completions bash > ~/.local/share/bash-completion/completions/recipe-index
    ///   zsh:   recipe-index completions zsh > ~/.zfunc/_recipe-index
    ///   fish:  recipe-index completions fish > ~/.config/fish/completions/recipe-index.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::xdg::XdgDirs;

    // Completions need no configuration
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.log_paths();
    xdg.ensure_dirs_exist()?;

    let config = Config::load_with_xdg(cli.config.as_deref(), &xdg)?;
    config.log_config();

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, config, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, &xdg, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
