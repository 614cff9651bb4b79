//! CLI definitions for the `estrado` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Server-rendered front-end for the events API.
#[derive(Parser)]
#[command(name = "estrado", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, env = "ESTRADO_CONFIG", default_value = "estrado.toml")]
    pub config: PathBuf,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve {
        /// Upstream API base URL.
        #[arg(long, env = "ESTRADO_API_BASE_URL")]
        api_base_url: Option<String>,

        #[arg(long, env = "ESTRADO_HOST")]
        host: Option<String>,

        #[arg(long, short, env = "ESTRADO_PORT")]
        port: Option<u16>,
    },

    /// Print the effective configuration as TOML.
    Config,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}
