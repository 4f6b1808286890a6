//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `serve`: Run the HTTP server
//! - `init`: Create the database and optionally the first admin account
//! - `account`: Create, delete and reset accounts against the store

pub mod account;
pub mod init;
pub mod serve;

pub use account::AccountCommand;
pub use init::InitCommand;
pub use serve::ServeCommand;
