//! CLI module for gatecheck
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `run` - Run the conformance matrix against a gateway
//! - `matrix` - Print the planned chat cases without sending anything
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Full sweep against the default target
//! gatecheck run
//!
//! # Only the Claude and Gemini chat cases, as JSON
//! gatecheck run --suite chat --protocol claude --protocol gemini --json
//! ```

pub mod completions;
pub mod config;
pub mod matrix;
pub mod output;
pub mod run;

pub use completions::handle_completions;
pub use config::handle_config_init;
pub use matrix::handle_matrix;
pub use run::handle_run;

use crate::matrix::Suite;
use crate::protocol::Protocol;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gatecheck - conformance harness for multi-protocol AI gateways
#[derive(Parser, Debug)]
#[command(
    name = "gatecheck",
    version,
    about = "Conformance harness for multi-protocol AI model gateways"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the conformance matrix
    Run(RunArgs),
    /// Print the planned chat cases
    Matrix(MatrixArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "gatecheck.toml")]
    pub config: PathBuf,

    /// Override gateway port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override gateway host
    #[arg(short = 'H', long, env = "GATECHECK_HOST")]
    pub host: Option<String>,

    /// API key sent to the gateway
    #[arg(short = 'k', long, env = "GATECHECK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Only run these protocols (repeatable, default all)
    #[arg(long = "protocol", value_enum)]
    pub protocols: Vec<Protocol>,

    /// Only run these suites (repeatable, default all)
    #[arg(long = "suite", value_enum)]
    pub suites: Vec<Suite>,

    /// Output the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GATECHECK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "gatecheck.toml")]
    pub config: PathBuf,

    /// Only show these protocols (repeatable, default all)
    #[arg(long = "protocol", value_enum)]
    pub protocols: Vec<Protocol>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "gatecheck.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
