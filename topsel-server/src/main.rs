//! Main entry point for the topsel server binary.
//!
//! One binary, two jobs: `serve` runs the HTTP API; `init` and
//! `account` administer the store locally for bootstrap and recovery.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use topsel_server::cli::{Cli, Command};
use topsel_server::utils::GlobalOptions;

fn main() {
    // Library `log` records and HTTP traces share one subscriber
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("topsel=info,topsel_server=info,tower_http=info")
        }))
        .init();

    let cli = Cli::parse();

    let global = GlobalOptions {
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
    };

    let result = match cli.command {
        Command::Serve(cmd) => cmd.execute(&global),
        Command::Init(cmd) => cmd.execute(&global),
        Command::Account(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
