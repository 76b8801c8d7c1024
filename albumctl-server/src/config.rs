//! Layered configuration
//!
//! Resolution order (later wins):
//! 1. Built-in defaults
//! 2. TOML file: explicit path, else `./albumctl.toml`, else `~/.albumctl/config.toml`
//! 3. Environment: `DATABASE_URL` / `POSTGRES_URL`, `ALBUMCTL_BIND`, `ALBUMCTL_AUTO_MIGRATE`
//!
//! CLI flags are applied on top by the binary.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "albumctl.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind_addr: SocketAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: Option<String>,

    /// Create the `album` table on startup if missing
    pub auto_migrate: bool,

    pub max_connections: u32,

    pub timeouts: QueryTimeouts,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            auto_migrate: true,
            max_connections: 10,
            timeouts: QueryTimeouts::default(),
        }
    }
}

impl DatabaseConfig {
    /// Connection string, or an error naming the variables that can supply it.
    pub fn require_url(&self) -> Result<&str, ConfigError> {
        self.url.as_deref().ok_or(ConfigError::MissingDatabaseUrl)
    }
}

/// Per-query time limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryTimeouts {
    /// Single-row statements and the batch transaction
    pub single_row_secs: u64,
    /// Full table scans
    pub full_scan_secs: u64,
}

impl Default for QueryTimeouts {
    fn default() -> Self {
        Self {
            single_row_secs: 15,
            full_scan_secs: 3,
        }
    }
}

impl QueryTimeouts {
    pub fn single_row(&self) -> Duration {
        Duration::from_secs(self.single_row_secs)
    }

    pub fn full_scan(&self) -> Duration {
        Duration::from_secs(self.full_scan_secs)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("database URL not set (use DATABASE_URL, POSTGRES_URL or [database].url)")]
    MissingDatabaseUrl,
}

impl AppConfig {
    /// Load from file (if any) and apply environment overrides.
    ///
    /// An explicit `path` must exist; the implicit locations are optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::from_file(path)?
            }
            None => match Self::discover() {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file. Missing sections fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// First existing implicit config location.
    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::home_dir()
            .map(|home| home.join(".albumctl").join("config.toml"))
            .filter(|p| p.exists())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").or_else(|| lookup("POSTGRES_URL")) {
            self.database.url = Some(url);
        }

        if let Some(value) = lookup("ALBUMCTL_BIND") {
            self.server.bind_addr = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "ALBUMCTL_BIND",
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup("ALBUMCTL_AUTO_MIGRATE") {
            self.database.auto_migrate = parse_bool(&value).ok_or(ConfigError::InvalidEnv {
                var: "ALBUMCTL_AUTO_MIGRATE",
                value: value.clone(),
            })?;
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
