//! Server configuration with layered resolution.
//!
//! Values resolve lowest-precedence first: built-in defaults, then the
//! YAML config file, then `TOPSEL_*` environment variables, then CLI
//! flags. The environment and flag layers arrive together through clap
//! (flags declare their `env` fallback), so this module merges defaults,
//! file and overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::CliError;

/// Default bind address for the HTTP server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default session token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Default connection pool size.
pub const DEFAULT_POOL_SIZE: usize = 8;

/// The subset of settings a config file may provide. Every field is
/// optional; unknown keys are rejected so typos fail loudly.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Socket address to bind.
    pub bind: Option<String>,
    /// Data directory holding the database file.
    pub data_dir: Option<PathBuf>,
    /// Shared secret for signing session tokens.
    pub token_secret: Option<String>,
    /// Session token lifetime in seconds.
    pub token_ttl_secs: Option<u64>,
    /// Connection pool size.
    pub pool_size: Option<usize>,
    /// Database busy timeout in seconds.
    pub busy_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Loads a config file, if a path is given.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_yaml::from_str(&raw)
            .map_err(|e| CliError::Config(format!("cannot parse {}: {e}", path.display())))
    }
}

/// Overrides from CLI flags and their `TOPSEL_*` environment fallbacks.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Socket address to bind.
    pub bind: Option<String>,
    /// Data directory holding the database file.
    pub data_dir: Option<PathBuf>,
    /// Shared secret for signing session tokens.
    pub token_secret: Option<String>,
    /// Session token lifetime in seconds.
    pub token_ttl_secs: Option<u64>,
    /// Connection pool size.
    pub pool_size: Option<usize>,
    /// Database busy timeout in seconds.
    pub busy_timeout_secs: Option<u64>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds.
    pub bind: String,
    /// Data directory; `None` means the library default (`~/.topsel`,
    /// or `TOPSEL_DATA_DIR`).
    pub data_dir: Option<PathBuf>,
    /// Shared secret for signing session tokens.
    pub token_secret: String,
    /// Session token lifetime.
    pub token_ttl: Duration,
    /// Connection pool size.
    pub pool_size: usize,
    /// Database busy timeout, if overriding the library default.
    pub busy_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Resolves the configuration from a file layer and an override layer.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when a resolved value is out of range or
    /// the token secret is missing.
    pub fn resolve(file: FileConfig, overrides: ConfigOverrides) -> Result<Self, CliError> {
        let bind = overrides
            .bind
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let data_dir = overrides.data_dir.or(file.data_dir);
        let token_secret = overrides
            .token_secret
            .or(file.token_secret)
            .ok_or_else(|| {
                CliError::Config(
                    "token_secret is required (config file, TOPSEL_TOKEN_SECRET or --token-secret)"
                        .to_string(),
                )
            })?;
        let token_ttl_secs = overrides
            .token_ttl_secs
            .or(file.token_ttl_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        let pool_size = overrides
            .pool_size
            .or(file.pool_size)
            .unwrap_or(DEFAULT_POOL_SIZE);
        let busy_timeout_secs = overrides.busy_timeout_secs.or(file.busy_timeout_secs);

        let config = Self {
            bind,
            data_dir,
            token_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            pool_size,
            busy_timeout: busy_timeout_secs.map(Duration::from_secs),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.token_secret.trim().is_empty() {
            return Err(CliError::Config(
                "token_secret must be non-empty".to_string(),
            ));
        }
        if self.token_ttl.as_secs() == 0 {
            return Err(CliError::Config(
                "token_ttl_secs must be at least 1".to_string(),
            ));
        }
        if self.pool_size == 0 {
            return Err(CliError::Config("pool_size must be at least 1".to_string()));
        }
        if self.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(CliError::Config(format!(
                "bind '{}' is not a valid socket address",
                self.bind
            )));
        }
        Ok(())
    }
}
