mod cli;
mod commands;
mod observability;
mod output;

use anyhow::{Context, Result};
use clap::Parser;

use cfkube_config::loader::load_config_with_default_path;
use cfkube_core::AuthInfo;
use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    // .env is optional; anything other than a missing file is worth a warning.
    if let Err(e) = dotenvy::dotenv() {
        let missing = matches!(
            e,
            dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        );
        if !missing {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config_with_default_path(cli.config.as_ref()).context("Configuration error")?;
    observability::apply_logging_level(&cfg.logging.level);
    tracing::debug!(
        default_domain = %cfg.manifest.default_domain_name,
        "Configuration loaded"
    );

    let auth = AuthInfo::new(cli.user.clone());
    match &cli.command {
        Commands::Apply(args) => {
            commands::apply::apply(&cfg, args, &auth, cli.format).await?;
        }
        Commands::State(args) => {
            commands::state::show(&cfg, args, &auth, cli.format.unwrap_or_default()).await?;
        }
    }

    Ok(())
}
