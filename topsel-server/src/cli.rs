//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{AccountCommand, InitCommand, ServeCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HTTP service and operator CLI for the topic reservation system.
#[derive(Parser)]
#[command(name = "topsel-server")]
#[command(version, about = "Run and administer the topic reservation service", long_about = None)]
pub struct Cli {
    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "TOPSEL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "TOPSEL_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Create the database and optionally the first admin account
    Init(InitCommand),

    /// Administer accounts directly against the store
    #[command(subcommand)]
    Account(AccountCommand),
}
