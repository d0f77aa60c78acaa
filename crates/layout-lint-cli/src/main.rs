//! layout-lint CLI tool.
//!
//! Usage:
//! ```bash
//! layout-lint check [OPTIONS] [PATH]
//! layout-lint list-rules
//! layout-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Layout checker for JavaScript and TypeScript sources
#[derive(Parser)]
#[command(name = "layout-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the discovered one
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// File or directory to check
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Glob pattern of paths to skip (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Apply automatic fixes and write the files back
        #[arg(long)]
        fix: bool,
    },

    /// List available rules
    ListRules,

    /// Write a starter layout-lint.toml
    Init {
        /// Replace an existing layout-lint.toml
        #[arg(long)]
        force: bool,
    },
}

/// How `check` prints violations.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Multi-line entries with hints.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// `file:line:column: severity [code] message` lines.
    Compact,
    /// Annotated source snippets.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
            fix,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                format,
                rules_filter: rules,
                exclude,
                fix,
            };
            commands::check::run(&path, options, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
