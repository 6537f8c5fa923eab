// Command line arguments for the `actopus` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Run actions against an Octopus Deploy server instance.
#[derive(Parser, Debug, Clone)]
#[command(name = "actopus", version, about, long_about = None)]
pub struct Cli {
    /// Log every request to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to read defaults from (default: ~/.actopus.json).
    #[arg(long, global = true, env = "ACTOPUS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a release for a project.
    Release(ReleaseArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReleaseArgs {
    /// Project name, matched exactly.
    pub project: String,

    /// Release version to create.
    pub release: String,

    /// Octopus server fqdn.
    #[arg(long, env = "ACTOPUS_SERVER")]
    pub server: Option<String>,

    /// API key for auth. Prompted for when missing and stdin is a terminal.
    #[arg(long, env = "ACTOPUS_API_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// API root to use instead of https://<server>/api.
    #[arg(long, env = "ACTOPUS_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate validation (insecure).
    #[arg(long)]
    pub insecure: bool,

    /// JSON endpoint table replacing the built-in one.
    #[arg(long, value_name = "FILE")]
    pub endpoints: Option<PathBuf>,
}
