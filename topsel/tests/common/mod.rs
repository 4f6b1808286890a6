//! Shared helpers for integration tests.
//!
//! Tests operate through the public API only: accounts come from the
//! directory (so profiles exist), topics from publish plans. Each helper
//! panics on failure; tests exercising failure paths call the plans
//! directly.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use topsel::directory::{create_account, AccountDetails, NewAccount};
use topsel::operations::{
    ConfirmOptions, ConfirmPlan, DeleteOptions, DeletePlan, ExecutionResult, PlanExecutor,
    PublishOptions, PublishPlan, RejectOptions, RejectPlan, ReserveOptions, ReservePlan,
    WithdrawPlan,
};
use topsel::{Database, DatabaseConfig, Identity, Result, Role};

/// A temporary database file shared by any number of connections.
#[allow(dead_code)]
pub struct TestStore {
    _dir: TempDir,
    path: PathBuf,
}

impl TestStore {
    /// Creates the store and initializes its schema.
    #[allow(dead_code)]
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topsel.db");
        // First open creates the schema
        drop(Database::open(DatabaseConfig::new(&path)).unwrap());
        Self { _dir: dir, path }
    }

    /// Opens a fresh connection to the store.
    #[allow(dead_code)]
    pub fn connect(&self) -> Database {
        Database::open(DatabaseConfig::new(&self.path)).unwrap()
    }

    /// Returns the database file path.
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The administrator identity used to seed accounts.
#[allow(dead_code)]
pub fn admin() -> Identity {
    Identity::new("root", Role::Admin)
}

/// Creates a teacher account with placeholder contact details.
#[allow(dead_code)]
pub fn seed_teacher(db: &mut Database, username: &str, display_name: &str) {
    let account = NewAccount::new(
        username,
        "pw",
        AccountDetails::Teacher {
            display_name: display_name.to_string(),
            email: format!("{username}@example.edu"),
            phone: "555-0100".to_string(),
            office: "A-100".to_string(),
        },
    )
    .unwrap()
    .with_bcrypt_cost(bcrypt_min_cost());
    create_account(db, &admin(), &account).unwrap();
}

/// Creates a student account with placeholder profile details.
#[allow(dead_code)]
pub fn seed_student(db: &mut Database, username: &str, display_name: &str) {
    let account = NewAccount::new(
        username,
        "pw",
        AccountDetails::Student {
            display_name: display_name.to_string(),
            major: "CS".to_string(),
            class_name: "CS-1".to_string(),
            email: format!("{username}@example.edu"),
            phone: "555-0200".to_string(),
        },
    )
    .unwrap()
    .with_bcrypt_cost(bcrypt_min_cost());
    create_account(db, &admin(), &account).unwrap();
}

/// Minimum bcrypt cost, to keep account seeding fast.
#[allow(dead_code)]
pub fn bcrypt_min_cost() -> u32 {
    4
}

/// Publishes a topic as the given teacher.
#[allow(dead_code)]
pub fn publish(db: &mut Database, teacher: &str, title: &str) -> Result<ExecutionResult> {
    let plan = PublishPlan::new(
        Identity::new(teacher, Role::Teacher),
        PublishOptions::new(title, "CS", "placeholder description"),
    )
    .build_plan(db.connection())?;
    PlanExecutor::new(db).execute(&plan)
}

/// Reserves a topic as the given student.
#[allow(dead_code)]
pub fn reserve(db: &mut Database, student: &str, title: &str) -> Result<ExecutionResult> {
    let plan = ReservePlan::new(
        Identity::new(student, Role::Student),
        ReserveOptions::new(title),
    )
    .build_plan(db.connection())?;
    PlanExecutor::new(db).execute(&plan)
}

/// Withdraws the given student's reservation.
#[allow(dead_code)]
pub fn withdraw(db: &mut Database, student: &str) -> Result<ExecutionResult> {
    let plan = WithdrawPlan::new(Identity::new(student, Role::Student))
        .build_plan(db.connection())?;
    PlanExecutor::new(db).execute(&plan)
}

/// Confirms a reservation as the owning teacher.
#[allow(dead_code)]
pub fn confirm(
    db: &mut Database,
    teacher: &str,
    title: &str,
    student_name: &str,
) -> Result<ExecutionResult> {
    let plan = ConfirmPlan::new(
        Identity::new(teacher, Role::Teacher),
        ConfirmOptions::new(title, student_name),
    )
    .build_plan(db.connection())?;
    PlanExecutor::new(db).execute(&plan)
}

/// Rejects a pending reservation as the owning teacher.
#[allow(dead_code)]
pub fn reject(db: &mut Database, teacher: &str, title: &str) -> Result<ExecutionResult> {
    let plan = RejectPlan::new(
        Identity::new(teacher, Role::Teacher),
        RejectOptions::new(title),
    )
    .build_plan(db.connection())?;
    PlanExecutor::new(db).execute(&plan)
}

/// Deletes a topic as the owning teacher.
#[allow(dead_code)]
pub fn delete(db: &mut Database, teacher: &str, title: &str) -> Result<ExecutionResult> {
    let plan = DeletePlan::new(
        Identity::new(teacher, Role::Teacher),
        DeleteOptions::new(title),
    )
    .build_plan(db.connection())?;
    PlanExecutor::new(db).execute(&plan)
}
