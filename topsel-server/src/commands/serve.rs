//! Serve command implementation.
//!
//! Resolves configuration, builds the pool and router, and runs the
//! HTTP server on a multi-threaded tokio runtime until interrupted.

use std::path::PathBuf;

use clap::Parser;
use topsel::database::DatabaseConfig;

use crate::config::{ConfigOverrides, FileConfig, ServerConfig};
use crate::error::CliError;
use crate::routes::build_router;
use crate::state::AppState;
use crate::utils::{resolve_db_path, GlobalOptions};

/// Run the HTTP server.
#[derive(Parser)]
#[command(about = "Run the HTTP server")]
pub struct ServeCommand {
    /// Path to a YAML config file
    #[arg(long, value_name = "FILE", env = "TOPSEL_CONFIG")]
    config: Option<PathBuf>,

    /// Socket address to bind
    #[arg(long, value_name = "ADDR", env = "TOPSEL_BIND")]
    bind: Option<String>,

    /// Shared secret for signing session tokens
    #[arg(long, value_name = "SECRET", env = "TOPSEL_TOKEN_SECRET")]
    token_secret: Option<String>,

    /// Session token lifetime in seconds
    #[arg(long, value_name = "SECONDS", env = "TOPSEL_TOKEN_TTL_SECS")]
    token_ttl: Option<u64>,

    /// Connection pool size
    #[arg(long, value_name = "N", env = "TOPSEL_POOL_SIZE")]
    pool_size: Option<usize>,
}

impl ServeCommand {
    /// Resolve the server configuration from file, environment and flags.
    pub fn resolve_config(&self, global: &GlobalOptions) -> Result<ServerConfig, CliError> {
        let file = FileConfig::load(self.config.as_deref())?;
        let overrides = ConfigOverrides {
            bind: self.bind.clone(),
            data_dir: global.data_dir.clone(),
            token_secret: self.token_secret.clone(),
            token_ttl_secs: self.token_ttl,
            pool_size: self.pool_size,
            busy_timeout_secs: global.busy_timeout,
        };
        ServerConfig::resolve(file, overrides)
    }

    /// Execute the serve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = self.resolve_config(global)?;

        // The database path follows the same resolution as the other
        // commands, with the config file as one more layer.
        let effective = GlobalOptions {
            data_dir: config.data_dir.clone().or_else(|| global.data_dir.clone()),
            busy_timeout: global.busy_timeout,
        };
        let db_path = resolve_db_path(&effective)?;
        let mut db_config = DatabaseConfig::new(db_path);
        if let Some(timeout) = config.busy_timeout {
            db_config = db_config.with_busy_timeout(timeout);
        }

        let state = AppState::new(
            db_config,
            &config.token_secret,
            config.token_ttl,
            config.pool_size,
        )?;
        let app = build_router(state);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(&config.bind).await?;
            tracing::info!(bind = %config.bind, "listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            Ok::<(), std::io::Error>(())
        })?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Exit cleanly on ctrl-c; a failed signal hook leaves the server
    // running rather than killing it
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
