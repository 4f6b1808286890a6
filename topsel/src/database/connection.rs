//! The `Database` handle: one owned `SQLite` connection, opened with the
//! settings every part of the system assumes.
//!
//! Concurrency control lives entirely in `SQLite`: WAL mode lets readers
//! proceed under a writer, and the busy timeout absorbs short lock
//! contention between racing reservation transactions. Nothing in this
//! crate adds a lock on top.

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

use super::config::DatabaseConfig;

/// An open handle to the topic store.
///
/// Each handle owns exactly one connection. The HTTP server keeps a pool
/// of these and lends one out per request; the CLI opens one for the
/// duration of a command. Handles are never shared between operations.
///
/// # Examples
///
/// ```no_run
/// use topsel::database::{Database, DatabaseConfig};
///
/// let db = Database::open(DatabaseConfig::new("/var/lib/topsel/topsel.db")).unwrap();
/// let open_topics = topsel::operations::list_topics(db.connection()).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    #[allow(dead_code)]
    config: DatabaseConfig,
}

impl Database {
    /// Opens the store at the configured path.
    ///
    /// Applies the connection settings the rest of the crate relies on:
    /// WAL journal mode, `synchronous = NORMAL`, and the configured busy
    /// timeout. With `auto_create` enabled the parent directory and the
    /// schema are created on first open; otherwise the file must already
    /// exist and carry a compatible schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be
    /// created or opened, a PRAGMA cannot be applied, or the schema
    /// version check fails.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // journal_mode is the one PRAGMA that answers with a row
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        super::migrations::check_schema_compatibility(&conn)?;

        Ok(Self { conn, config })
    }

    /// Borrows the underlying connection for queries.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Borrows the underlying connection mutably, as transactions require.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
