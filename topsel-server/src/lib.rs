//! Library exports for topsel-server.
//!
//! The binary has two faces: an HTTP API over the reservation engine
//! and an operator CLI for local administration (`init`, `account`).
//! The router and state are exported so integration tests can drive
//! the API in-process without binding a socket.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod utils;

pub use api::ApiError;
pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::build_router;
pub use state::AppState;
