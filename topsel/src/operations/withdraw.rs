//! Withdraw operation planning.
//!
//! A student gives back the topic they hold. The topic returns to open
//! and the student's slot frees up in the same transaction. Confirmed
//! reservations cannot be withdrawn.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};

use super::plan::{OperationPlan, PlanAction};

/// A withdraw plan generator.
///
/// Withdrawal takes no parameters beyond the caller: a student can hold
/// at most one reservation, so there is nothing to select.
pub struct WithdrawPlan {
    caller: Identity,
}

impl WithdrawPlan {
    /// Creates a new withdraw plan for the given caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::WithdrawPlan;
    /// use topsel::{Identity, Role};
    ///
    /// let planner = WithdrawPlan::new(Identity::new("s1", Role::Student));
    /// ```
    #[must_use]
    pub const fn new(caller: Identity) -> Self {
        Self { caller }
    }

    /// Builds an operation plan for this withdrawal.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not a student (`PermissionDenied`)
    /// - The caller holds no reservation (`NotFound`)
    /// - The caller's reservation is confirmed (`InvalidState`)
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        self.caller.require_role(Role::Student)?;

        let student = &self.caller.username;
        let topic =
            Database::get_topic_by_holder(conn, student)?.ok_or_else(|| Error::NotFound {
                resource: format!("reservation for student '{student}'"),
            })?;
        if topic.is_confirmed() {
            return Err(Error::InvalidState {
                details: format!(
                    "reservation on '{}' is confirmed and cannot be withdrawn",
                    topic.title()
                ),
            });
        }

        let plan = OperationPlan::new(format!(
            "Withdraw {student}'s reservation on '{}'",
            topic.title()
        ))
        .add_action(PlanAction::ReleaseStudentHolding {
            student: student.clone(),
        })
        .add_action(PlanAction::ClearStudentReservation {
            username: student.clone(),
        });

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, seed_student, seed_teacher, seed_topic};
    use crate::operations::{PlanExecutor, ReserveOptions, ReservePlan};
    use crate::topic::Availability;

    fn reserve(db: &mut crate::database::Database, student: &str, title: &str) {
        let plan = ReservePlan::new(
            Identity::new(student, Role::Student),
            ReserveOptions::new(title),
        )
        .build_plan(db.connection())
        .unwrap();
        PlanExecutor::new(db).execute(&plan).unwrap();
    }

    #[test]
    fn test_plan_requires_student_role() {
        let db = create_test_database();

        let err = WithdrawPlan::new(Identity::new("t1", Role::Teacher))
            .build_plan(db.connection())
            .unwrap_err();

        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_plan_no_holding() {
        let db = create_test_database();
        seed_student(db.connection(), "s1", "Shen Yi");

        let err = WithdrawPlan::new(Identity::new("s1", Role::Student))
            .build_plan(db.connection())
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_plan_pending_holding() {
        let mut db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_student(db.connection(), "s1", "Shen Yi");
        seed_topic(db.connection(), "T1", "t1");
        reserve(&mut db, "s1", "T1");

        let plan = WithdrawPlan::new(Identity::new("s1", Role::Student))
            .build_plan(db.connection())
            .unwrap();

        assert_eq!(plan.len(), 2);
        assert!(matches!(
            plan.actions[0],
            PlanAction::ReleaseStudentHolding { .. }
        ));
        assert!(matches!(
            plan.actions[1],
            PlanAction::ClearStudentReservation { .. }
        ));
    }

    #[test]
    fn test_plan_confirmed_holding() {
        let mut db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_student(db.connection(), "s1", "Shen Yi");
        seed_topic(db.connection(), "T1", "t1");
        reserve(&mut db, "s1", "T1");
        Database::confirm_topic(db.connection(), "T1", "s1").unwrap();

        let err = WithdrawPlan::new(Identity::new("s1", Role::Student))
            .build_plan(db.connection())
            .unwrap_err();

        assert!(matches!(err, Error::InvalidState { .. }));
    }

    #[test]
    fn test_withdraw_round_trip_restores_topic() {
        let mut db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_student(db.connection(), "s1", "Shen Yi");
        seed_topic(db.connection(), "T1", "t1");

        let before = Database::get_topic_by_title(db.connection(), "T1")
            .unwrap()
            .unwrap();

        reserve(&mut db, "s1", "T1");

        let plan = WithdrawPlan::new(Identity::new("s1", Role::Student))
            .build_plan(db.connection())
            .unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();

        let after = Database::get_topic_by_title(db.connection(), "T1")
            .unwrap()
            .unwrap();
        assert_eq!(after, before);
        assert_eq!(after.availability(), Availability::Open);
        assert_eq!(after.reserved_by(), None);

        let profile = Database::get_student_profile(db.connection(), "s1")
            .unwrap()
            .unwrap();
        assert_eq!(profile.current_reservation, None);
    }
}
