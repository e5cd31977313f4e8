//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "horizon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Operator shell for a host running the Horizon module")]
pub struct Cli {
    /// Host configuration file (defaults to `<base>/config/app.toml` when present)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Application base path
    #[arg(long, short, global = true, default_value = ".")]
    pub base: PathBuf,

    /// Bootstrap as a long-running server instead of a console process
    #[arg(long, global = true)]
    pub server: bool,

    /// Also write log files to this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// List registered routes
    Routes {},
    /// List registered console commands
    Commands {},
    /// List events and their listeners in dispatch order
    Events {},
    /// Print a configuration value (dotted key, e.g. `horizon.uri`)
    Config {
        key: String,
    },
    /// Publish a tagged resource group
    Publish {
        /// Tag to publish (every tag when omitted)
        #[arg(long)]
        tag: Option<String>,
        /// Overwrite files that already exist
        #[arg(long)]
        force: bool,
    },
    /// Summary of providers, bindings and declarations
    Status {},
}
