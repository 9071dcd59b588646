use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cfkube")]
#[command(about = "cfkube: apply application manifests to a space")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (defaults to cfkube.toml)
    #[arg(short, long, global = true, env = "CFKUBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// User name the store operations run as
    #[arg(long, global = true, env = "CFKUBE_USER", default_value = "admin")]
    pub user: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a manifest to a space
    Apply(ApplyArgs),
    /// Show the collected state of one app
    State(StateArgs),
}

#[derive(clap::Args)]
pub struct ApplyArgs {
    /// Space GUID
    #[arg(long)]
    pub space: String,
    /// Path to the manifest (reads from stdin if omitted)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
    /// Store snapshot to start from (YAML, or JSON by extension)
    #[arg(long)]
    pub state: Option<PathBuf>,
    /// Where to write the store snapshot after the apply
    #[arg(long)]
    pub write_state: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct StateArgs {
    /// Space GUID
    #[arg(long)]
    pub space: String,
    /// App name
    #[arg(long)]
    pub app: String,
    /// Store snapshot to read
    #[arg(long)]
    pub state: PathBuf,
}
