//! albumctl-server: album records over HTTP
//!
//! Layers, outermost first:
//! - `http`: axum routes, JSON error mapping, server loop
//! - `usecase`: passthrough orchestration
//! - `db`: connection pool, migrations, repositories
//!
//! Dependencies are wired explicitly: the pool goes into a repository, the
//! repository into an [`AlbumUsecase`], the use-case into the router state.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod usecase;

pub use config::{AppConfig, ConfigError};
pub use usecase::AlbumUsecase;
