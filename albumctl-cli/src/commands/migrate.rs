//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use albumctl_server::db::{self, migrations};
use albumctl_server::AppConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Create the album table, then close the pool
pub async fn run_migrate(args: MigrateArgs, mut config: AppConfig) -> Result<()> {
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }
    let database_url = config.database.require_url()?;

    let pool = db::create_pool_with_options(database_url, 1)
        .await
        .context("Failed to open database")?;

    let result = migrations::run(&pool)
        .await
        .context("Migration failed");

    db::close_pool(pool).await;
    result
}
