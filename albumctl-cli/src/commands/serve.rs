//! HTTP server command
//!
//! Wires pool → repository → use-case → router and blocks until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use albumctl_server::db::{self, PgAlbumRepo};
use albumctl_server::http::{run_server, AppState};
use albumctl_server::{AlbumUsecase, AppConfig};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (overrides config; default: 0.0.0.0:4000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Skip creating the album table on startup
    #[arg(long)]
    pub no_migrate: bool,
}

impl ServeArgs {
    /// Apply command-line overrides on top of loaded configuration.
    fn apply(self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if let Some(url) = self.database_url {
            config.database.url = Some(url);
        }
        if self.no_migrate {
            config.database.auto_migrate = false;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    args.apply(&mut config);
    let database_url = config.database.require_url()?;

    tracing::info!("Starting albumctl server on {}", config.server.bind_addr);

    let pool = db::open(
        database_url,
        config.database.max_connections,
        config.database.auto_migrate,
    )
    .await
    .context("Failed to open database")?;

    let repo = PgAlbumRepo::new(pool.clone(), config.database.timeouts);
    let state = AppState {
        albums: AlbumUsecase::new(Arc::new(repo)),
    };

    // Run server (blocks until shutdown)
    let result = run_server(state, &config.server)
        .await
        .context("Server error");

    db::close_pool(pool).await;
    result
}
