//! Shell configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCKDASH_ROUTES` - Path to a YAML route table (default: built-in dashboard table)
//! - `STOCKDASH_LOGIN_PATH` - Login route (default: /auth/login)
//! - `STOCKDASH_FALLBACK_PATH` - Landing page for non-admins (default: /profile-info)
//! - `STOCKDASH_LOG_FORMAT` - `text` or `json` (default: text)
//! - `RUST_LOG` - Tracing filter (default: stockdash=info,stockdash_core=info)

use std::path::{Path, PathBuf};

use stockdash_core::{GuardConfig, RouteTable, RouteTableError};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot read route table {path}: {source}")]
    RouteFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid route table {path}: {source}")]
    RouteTable {
        path: PathBuf,
        source: RouteTableError,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected text or json, got {s}")),
        }
    }
}

/// Dashboard shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// YAML route table to load instead of the built-in one
    pub routes_file: Option<PathBuf>,
    /// Login and fallback routes used by the guard
    pub guard: GuardConfig,
    /// Log output format
    pub log_format: LogFormat,
}

impl ShellConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = GuardConfig::default();

        let routes_file = lookup("STOCKDASH_ROUTES")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let login_path = route_path(&lookup, "STOCKDASH_LOGIN_PATH", defaults.login_path)?;
        let fallback_path =
            route_path(&lookup, "STOCKDASH_FALLBACK_PATH", defaults.fallback_path)?;
        let log_format = lookup("STOCKDASH_LOG_FORMAT")
            .map(|value| value.parse::<LogFormat>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKDASH_LOG_FORMAT".to_string(), e))?
            .unwrap_or_default();

        Ok(Self {
            routes_file,
            guard: GuardConfig::new(&login_path, &fallback_path),
            log_format,
        })
    }

    /// Load the route table: `override_file`, then `STOCKDASH_ROUTES`, then
    /// the built-in dashboard table. Lints are logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_route_table(&self, override_file: Option<&Path>) -> Result<RouteTable, ConfigError> {
        let table = match override_file.or(self.routes_file.as_deref()) {
            Some(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::RouteFile {
                    path: path.to_owned(),
                    source,
                })?;
                let table =
                    RouteTable::from_yaml(&yaml).map_err(|source| ConfigError::RouteTable {
                        path: path.to_owned(),
                        source,
                    })?;
                tracing::info!(path = %path.display(), "Loaded route table");
                table
            }
            None => RouteTable::dashboard(),
        };

        for lint in table.lint() {
            tracing::warn!(%lint, "Route table lint");
        }
        Ok(table)
    }
}

fn route_path(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: String,
) -> Result<String, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    if !value.starts_with('/') || value.contains(['?', '#']) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute path without query or fragment".to_string(),
        ));
    }
    Ok(value)
}
