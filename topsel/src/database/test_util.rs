//! In-crate test fixtures: a throwaway store plus seed helpers.
//!
//! Unit tests across the crate build their scenarios from these; the
//! integration tests under `tests/` carry their own copies since this
//! module is compiled only for unit tests.

use chrono::Utc;
use rusqlite::Connection;
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::profile::{StudentProfile, TeacherProfile};
use crate::topic::{Topic, TopicDraft};

/// Opens a fresh store in a temporary directory.
///
/// # Panics
///
/// Panics on any setup failure; tests want the loud version.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let db = Database::open(DatabaseConfig::new(dir.path().join("store.db"))).unwrap();

    // The backing file must outlive the handle; leak the tempdir guard
    std::mem::forget(dir);

    db
}

/// Inserts a teacher profile with placeholder contact details.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn seed_teacher(conn: &Connection, username: &str, display_name: &str) {
    let profile = TeacherProfile {
        username: username.to_string(),
        display_name: display_name.to_string(),
        email: format!("{username}@example.edu"),
        phone: "555-0100".to_string(),
        office: "A-100".to_string(),
    };
    Database::insert_teacher_profile(conn, &profile).unwrap();
}

/// Inserts a student profile with no reservation and placeholder details.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn seed_student(conn: &Connection, username: &str, display_name: &str) {
    let profile = StudentProfile {
        username: username.to_string(),
        display_name: display_name.to_string(),
        major: "CS".to_string(),
        class_name: "CS-1".to_string(),
        email: format!("{username}@example.edu"),
        phone: "555-0200".to_string(),
        current_reservation: None,
        final_reservation: None,
    };
    Database::insert_student_profile(conn, &profile).unwrap();
}

/// Inserts an open topic owned by the given teacher.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn seed_topic(conn: &Connection, title: &str, owner: &str) -> Topic {
    let draft = TopicDraft::new(title, "CS", "placeholder description").unwrap();
    Database::insert_topic(conn, &draft, owner, Utc::now()).unwrap()
}
