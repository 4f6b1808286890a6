//! Utility functions shared across CLI commands.

use std::path::PathBuf;
use std::time::Duration;

use topsel::database::{resolve_database_path, DatabaseConfig};
use topsel::Database;

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u64>,
}

/// Resolve the database path from global options.
///
/// Priority: `--data-dir` flag, then the library resolution
/// (`TOPSEL_DATA_DIR`, then `~/.topsel`).
pub fn resolve_db_path(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    if let Some(ref data_dir) = global.data_dir {
        return Ok(data_dir.join("topsel.db"));
    }
    resolve_database_path().map_err(CliError::from)
}

/// Build a database config from global options.
pub fn database_config(global: &GlobalOptions) -> Result<DatabaseConfig, CliError> {
    let path = resolve_db_path(global)?;
    let mut config = DatabaseConfig::new(path);
    if let Some(secs) = global.busy_timeout {
        config = config.with_busy_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

/// Open the database with configuration from global options.
pub fn open_database(global: &GlobalOptions) -> Result<Database, CliError> {
    Database::open(database_config(global)?).map_err(CliError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_flag_wins() {
        let global = GlobalOptions {
            data_dir: Some(PathBuf::from("/custom/dir")),
            busy_timeout: None,
        };
        let path = resolve_db_path(&global).unwrap();
        assert_eq!(path, PathBuf::from("/custom/dir/topsel.db"));
    }

    #[test]
    fn test_busy_timeout_applied() {
        let global = GlobalOptions {
            data_dir: Some(PathBuf::from("/custom/dir")),
            busy_timeout: Some(30),
        };
        let config = database_config(&global).unwrap();
        assert_eq!(config.busy_timeout, Duration::from_secs(30));
    }
}
