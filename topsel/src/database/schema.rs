//! Database schema definitions and SQL constants.
//!
//! This module contains all table definitions, indices, and constants
//! related to the database schema for the topsel reservation system.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for database configuration
/// and versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the accounts table.
///
/// One row per login. The role column holds the canonical lowercase
/// role name; profile fields live in the role-specific tables.
pub const CREATE_ACCOUNTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS accounts (
        username TEXT PRIMARY KEY NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create the students table.
///
/// `current_reservation` and `final_reservation` hold topic titles and
/// are the student-side halves of the reservation invariants. They are
/// written only by engine transactions, never directly.
pub const CREATE_STUDENTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS students (
        username TEXT PRIMARY KEY NOT NULL,
        display_name TEXT NOT NULL,
        major TEXT NOT NULL,
        class_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        current_reservation TEXT,
        final_reservation TEXT
    )";

/// SQL statement to create the teachers table.
pub const CREATE_TEACHERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS teachers (
        username TEXT PRIMARY KEY NOT NULL,
        display_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        office TEXT NOT NULL
    )";

/// SQL statement to create the topics table.
///
/// The UNIQUE constraint on title is the store-level duplicate check:
/// publish relies on it instead of a racy pre-check query. A topic is
/// open exactly when `reserved_by` is NULL; `availability` mirrors that
/// for listing without NULL tests.
pub const CREATE_TOPICS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS topics (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL UNIQUE,
        owner TEXT NOT NULL,
        required_major TEXT NOT NULL,
        content TEXT NOT NULL,
        availability TEXT NOT NULL DEFAULT 'open',
        confirmation_state TEXT NOT NULL DEFAULT 'pending',
        reserved_by TEXT,
        final_student TEXT,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create the notices table.
pub const CREATE_NOTICES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS notices (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        author TEXT NOT NULL,
        posted_at INTEGER NOT NULL
    )";

/// SQL statement to create an index on the topic owner column.
///
/// This index speeds up the teacher dashboard and ownership checks.
pub const CREATE_TOPIC_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_topics_owner ON topics(owner)";

/// SQL statement to create an index on the `reserved_by` column.
///
/// This index speeds up holder lookups for withdraw and the student view.
pub const CREATE_TOPIC_HOLDER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_topics_reserved_by ON topics(reserved_by)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
