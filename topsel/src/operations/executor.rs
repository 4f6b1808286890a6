//! Plan execution engine.
//!
//! This module implements the executor that takes operation plans
//! and applies them to the database.
//!
//! Every plan executes inside a single immediate transaction. The
//! mutating actions are guarded updates, so when a plan was built on
//! state that has since changed, the stale action affects zero rows,
//! the executor classifies the failure by re-reading the row inside
//! the same transaction, and the whole plan rolls back. A failed
//! operation therefore never leaves the topic side and the student
//! side disagreeing.

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::topic::Topic;

use super::plan::{OperationPlan, PlanAction};
use super::reserve::reserve_conflict;

/// Result of executing a plan.
///
/// This struct provides information about what happened during execution,
/// including whether it was a dry run and what actions were taken.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The topic that was created (if applicable).
    pub topic: Option<Topic>,
}

impl ExecutionResult {
    /// Creates a successful execution result.
    fn success(plan: &OperationPlan, topic: Option<Topic>) -> Self {
        Self {
            success: true,
            dry_run: false,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            topic,
        }
    }

    /// Creates a dry-run execution result.
    fn dry_run(plan: &OperationPlan) -> Self {
        Self {
            success: true,
            dry_run: true,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            topic: None,
        }
    }
}

/// Executes operation plans against the database.
///
/// The executor can run in normal mode (applying changes) or dry-run mode
/// (validating without changes).
///
/// # Examples
///
/// ```no_run
/// use topsel::operations::{PlanExecutor, ReserveOptions, ReservePlan};
/// use topsel::{Database, DatabaseConfig, Identity, Role};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/topsel.db")).unwrap();
/// let caller = Identity::new("s1", Role::Student);
///
/// let options = ReserveOptions::new("Graph Compression");
/// let plan = ReservePlan::new(caller, options)
///     .build_plan(db.connection())
///     .unwrap();
///
/// let mut executor = PlanExecutor::new(&mut db);
/// let result = executor.execute(&plan).unwrap();
/// assert!(result.success);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use topsel::operations::PlanExecutor;
    /// use topsel::{Database, DatabaseConfig};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/topsel.db")).unwrap();
    /// let executor = PlanExecutor::new(&mut db);
    /// ```
    #[must_use]
    pub const fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode, the executor validates the plan but does not
    /// actually modify the database.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// All actions run in one immediate transaction; the transaction
    /// commits only if every action succeeds, and a drop on the error
    /// path rolls everything back.
    ///
    /// # Errors
    ///
    /// Returns the typed failure of the first action whose precondition
    /// no longer holds, or a database error.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            return Ok(ExecutionResult::dry_run(plan));
        }

        let tx = self
            .db
            .connection_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut created = None;
        for action in &plan.actions {
            if let Some(topic) = Self::execute_action(&tx, action)? {
                created = Some(topic);
            }
        }

        tx.commit()?;

        Ok(ExecutionResult::success(plan, created))
    }

    /// Executes a single action.
    ///
    /// Returns `Ok(Some(topic))` for topic creation, `Ok(None)` for other
    /// actions.
    fn execute_action(conn: &Connection, action: &PlanAction) -> Result<Option<Topic>> {
        match action {
            PlanAction::CreateTopic { draft, owner } => {
                let topic = Database::insert_topic(conn, draft, owner, Utc::now())?;
                Ok(Some(topic))
            }
            PlanAction::ClaimTopic { title, student } => {
                if !Database::claim_topic(conn, title, student)? {
                    return Err(claim_topic_failure(conn, title));
                }
                Ok(None)
            }
            PlanAction::ClaimStudentSlot { username, title } => {
                if !Database::claim_student_slot(conn, username, title)? {
                    return Err(claim_slot_failure(conn, username, title));
                }
                Ok(None)
            }
            PlanAction::ReleaseStudentHolding { student } => {
                if !Database::release_held_topic(conn, student)? {
                    return Err(withdraw_failure(conn, student));
                }
                Ok(None)
            }
            PlanAction::ClearStudentReservation { username } => {
                if !Database::clear_student_reservation(conn, username)? {
                    return Err(Error::NotFound {
                        resource: format!("student profile '{username}'"),
                    });
                }
                Ok(None)
            }
            PlanAction::ReleaseTopic { title } => {
                if !Database::release_topic(conn, title)? {
                    return Err(release_failure(conn, title));
                }
                Ok(None)
            }
            PlanAction::DetachHolders { title } => {
                Database::detach_current_holders(conn, title)?;
                Ok(None)
            }
            PlanAction::ConfirmTopic { title, student } => {
                if !Database::confirm_topic(conn, title, student)? {
                    return Err(confirm_failure(conn, title));
                }
                Ok(None)
            }
            PlanAction::SetFinalReservation { username, title } => {
                if !Database::set_student_final(conn, username, title)? {
                    return Err(Error::NotFound {
                        resource: format!("student profile '{username}'"),
                    });
                }
                Ok(None)
            }
            PlanAction::DeleteTopic { title } => {
                if !Database::delete_topic(conn, title)? {
                    return Err(delete_failure(conn, title));
                }
                Ok(None)
            }
            PlanAction::ClearReservationPointers { title } => {
                Database::clear_reservation_pointers(conn, title)?;
                Ok(None)
            }
        }
    }
}

/// Classifies a failed topic claim without leaving the transaction.
fn claim_topic_failure(conn: &Connection, title: &str) -> Error {
    match Database::get_topic_by_title(conn, title) {
        Ok(None) => Error::NotFound {
            resource: format!("topic '{title}'"),
        },
        Ok(Some(_)) => reserve_conflict(title),
        Err(e) => e,
    }
}

/// Classifies a failed student-slot claim without leaving the transaction.
fn claim_slot_failure(conn: &Connection, username: &str, title: &str) -> Error {
    match Database::get_student_profile(conn, username) {
        Ok(None) => Error::NotFound {
            resource: format!("student profile '{username}'"),
        },
        Ok(Some(_)) => reserve_conflict(title),
        Err(e) => e,
    }
}

/// Classifies a failed withdrawal without leaving the transaction.
fn withdraw_failure(conn: &Connection, student: &str) -> Error {
    match Database::get_topic_by_holder(conn, student) {
        Ok(None) => Error::NotFound {
            resource: format!("reservation for student '{student}'"),
        },
        // The guard only skips confirmed holdings
        Ok(Some(topic)) => Error::InvalidState {
            details: format!(
                "reservation on '{}' is confirmed and cannot be withdrawn",
                topic.title()
            ),
        },
        Err(e) => e,
    }
}

/// Classifies a failed release without leaving the transaction.
fn release_failure(conn: &Connection, title: &str) -> Error {
    match Database::get_topic_by_title(conn, title) {
        Ok(None) => Error::NotFound {
            resource: format!("topic '{title}'"),
        },
        Ok(Some(topic)) if topic.final_student().is_some() => Error::Conflict {
            details: format!("reservation on '{title}' is already confirmed"),
        },
        Ok(Some(_)) => Error::InvalidState {
            details: format!("topic '{title}' has no pending reservation"),
        },
        Err(e) => e,
    }
}

/// Classifies a failed confirmation without leaving the transaction.
fn confirm_failure(conn: &Connection, title: &str) -> Error {
    match Database::get_topic_by_title(conn, title) {
        Ok(None) => Error::NotFound {
            resource: format!("topic '{title}'"),
        },
        Ok(Some(topic)) if topic.final_student().is_some() => Error::Conflict {
            details: format!("reservation on '{title}' is already confirmed"),
        },
        Ok(Some(_)) => Error::Conflict {
            details: format!("topic '{title}' is not held by the expected student"),
        },
        Err(e) => e,
    }
}

/// Classifies a failed delete without leaving the transaction.
fn delete_failure(conn: &Connection, title: &str) -> Error {
    match Database::get_topic_by_title(conn, title) {
        Ok(None) => Error::NotFound {
            resource: format!("topic '{title}'"),
        },
        // The guard only refuses confirmed topics
        Ok(Some(_)) => Error::InvalidState {
            details: format!("topic '{title}' has a confirmed reservation and cannot be deleted"),
        },
        Err(e) => e,
    }
}
