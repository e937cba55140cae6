//! rulecfg CLI tool.
//!
//! Usage:
//! ```bash
//! rulecfg resolve [OPTIONS] <FILE>
//! rulecfg check-name <FILE> --selector <SELECTOR> <NAME>...
//! rulecfg scan [PATH]
//! rulecfg list-presets
//! rulecfg init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Resolve eslintrc-style rule configuration for JavaScript/TypeScript/Svelte files
#[derive(Parser)]
#[command(name = "rulecfg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file (disables cascading)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration for a file
    Resolve {
        /// File to resolve
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check names against the naming convention in effect for a file
    CheckName {
        /// File the names are declared in
        file: PathBuf,

        /// Kind of symbol (e.g. variable, typeLike, classProperty)
        #[arg(short, long)]
        selector: String,

        /// Symbol modifiers (comma-separated, e.g. const,exported)
        #[arg(short, long, value_delimiter = ',')]
        modifiers: Vec<String>,

        /// Names to check
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List lintable files with their parser and enabled rule count
    Scan {
        /// Path to scan (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List built-in presets, plugins and environments
    ListPresets,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for resolved configuration.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-rule compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve { file, format } => {
            let resolution = resolution(cli.config.as_deref())?;
            commands::resolve::run(&resolution, &file, format)
        }
        Commands::CheckName {
            file,
            selector,
            modifiers,
            names,
        } => {
            let resolution = resolution(cli.config.as_deref())?;
            commands::check_name::run(&resolution, &file, &selector, &modifiers, &names)
        }
        Commands::Scan { path, format } => {
            let resolution = resolution(cli.config.as_deref())?;
            commands::scan::run(&resolution, &path, format)
        }
        Commands::ListPresets => {
            commands::list_presets::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

fn resolution(explicit: Option<&std::path::Path>) -> Result<commands::Resolution> {
    let source = config_resolver::resolve(explicit);
    commands::Resolution::from_source(&source)
}
