//! Integration tests for the store layer: schema lifecycle, durability
//! across reopens, and version gating.

mod common;

use common::{publish, reserve, seed_student, seed_teacher, TestStore};
use topsel::database::{get_schema_version, Database, DatabaseConfig};
use topsel::Error;

#[test]
fn fresh_store_records_current_schema_version() {
    let store = TestStore::new();
    let db = store.connect();
    let version = get_schema_version(db.connection()).unwrap();
    assert_eq!(version, 1);
}

#[test]
fn data_survives_reopen() {
    let store = TestStore::new();
    {
        let mut db = store.connect();
        seed_teacher(&mut db, "t1", "Prof. Tang");
        seed_student(&mut db, "s1", "Shen Yi");
        publish(&mut db, "t1", "T1").unwrap();
        reserve(&mut db, "s1", "T1").unwrap();
    }

    let db = store.connect();
    let topic = Database::get_topic_by_title(db.connection(), "T1")
        .unwrap()
        .unwrap();
    assert_eq!(topic.reserved_by(), Some("s1"));
    let profile = Database::get_student_profile(db.connection(), "s1")
        .unwrap()
        .unwrap();
    assert_eq!(profile.current_reservation.as_deref(), Some("T1"));
}

#[test]
fn newer_schema_version_is_rejected() {
    let store = TestStore::new();
    {
        let db = store.connect();
        db.connection()
            .execute(
                "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
                [],
            )
            .unwrap();
    }

    let err = Database::open(DatabaseConfig::new(store.path())).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedSchemaVersion { found: 999, .. }
    ));
}

#[test]
fn integrity_check_passes_on_healthy_store() {
    let store = TestStore::new();
    let mut db = store.connect();
    seed_teacher(&mut db, "t1", "Prof. Tang");
    publish(&mut db, "t1", "T1").unwrap();

    db.verify_integrity().unwrap();
}

#[test]
fn missing_file_without_auto_create_fails() {
    let store = TestStore::new();
    let path = store.path().parent().unwrap().join("absent.db");
    let config = DatabaseConfig::new(path).read_only();
    assert!(Database::open(config).is_err());
}

#[test]
fn unique_title_constraint_is_enforced_by_the_store() {
    let store = TestStore::new();
    let mut db = store.connect();
    seed_teacher(&mut db, "t1", "Prof. Tang");
    publish(&mut db, "t1", "T1").unwrap();

    let result = db.connection().execute(
        "INSERT INTO topics (title, owner, required_major, content, availability,
                             confirmation_state, created_at)
         VALUES ('T1', 't1', 'CS', 'body', 'open', 'pending', 0)",
        [],
    );
    let err: Error = result.unwrap_err().into();
    assert!(err.is_constraint_violation());
}
