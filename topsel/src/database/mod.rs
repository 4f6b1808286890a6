//! Database layer for persistent storage of topics, profiles and accounts.
//!
//! This module provides a SQLite-based storage layer for the topic
//! selection service, including connection management, schema versioning,
//! and the row-level primitives the reservation engine composes into
//! transactions.
//!
//! # Examples
//!
//! ```no_run
//! use topsel::database::{Database, DatabaseConfig};
//!
//! // Open a database
//! let config = DatabaseConfig::new("/tmp/topsel.db");
//! let db = Database::open(config).unwrap();
//!
//! // List every published topic with its owner's contact details
//! let summaries = Database::list_topic_summaries(db.connection()).unwrap();
//! for summary in summaries {
//!     println!("{} ({})", summary.topic.title(), summary.teacher.display_name);
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{default_data_dir, resolve_database_path, DatabaseConfig};
pub use connection::Database;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
