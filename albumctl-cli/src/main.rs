//! albumctl CLI - album records service
//!
//! Entry point for the `albumctl` binary:
//! - `serve`: run the HTTP API on top of PostgreSQL
//! - `migrate`: create the album table and exit
//!
//! `.env` in the working directory is loaded before configuration so that
//! `DATABASE_URL`, `POSTGRES_URL` and `RUST_LOG` can live there.

use std::path::PathBuf;

use albumctl_server::AppConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "albumctl",
    author,
    version,
    about = "CRUD service for album records (title, artist, price) backed by PostgreSQL"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(long, global = true)]
    debug: bool,

    /// Path to a TOML config file (default: ./albumctl.toml, then ~/.albumctl/config.toml)
    #[arg(long, short = 'c', global = true, env = "ALBUMCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the album table if missing, then exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::Migrate(args) => commands::run_migrate(args, config).await?,
    }
    Ok(())
}
