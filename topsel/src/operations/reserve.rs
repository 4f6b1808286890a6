//! Reserve operation planning.
//!
//! This module implements the reservation planning logic: the role gate,
//! the advisory precondition reads, and the pair of guarded actions that
//! claim the topic side and the student side together.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};

use super::plan::{OperationPlan, PlanAction};

/// The failure reported when either reserve precondition does not hold.
///
/// Topic-already-taken and student-already-holding are deliberately
/// indistinguishable: both produce this same conflict, and callers who
/// want to explain the failure must re-query.
pub(crate) fn reserve_conflict(title: &str) -> Error {
    Error::Conflict {
        details: format!("could not reserve topic '{title}'"),
    }
}

/// Options for a reserve operation.
///
/// This struct contains all the parameters needed to plan a reservation.
#[derive(Debug, Clone)]
pub struct ReserveOptions {
    /// The title of the topic to reserve.
    pub title: String,
}

impl ReserveOptions {
    /// Creates a new `ReserveOptions` for the given topic title.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::ReserveOptions;
    ///
    /// let options = ReserveOptions::new("Graph Compression");
    /// assert_eq!(options.title, "Graph Compression");
    /// ```
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// A reserve plan generator.
///
/// This struct is responsible for analyzing a reservation request and
/// generating a plan that describes what actions to take.
pub struct ReservePlan {
    caller: Identity,
    options: ReserveOptions,
}

impl ReservePlan {
    /// Creates a new reserve plan for the given caller and options.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::{ReserveOptions, ReservePlan};
    /// use topsel::{Identity, Role};
    ///
    /// let caller = Identity::new("s1", Role::Student);
    /// let planner = ReservePlan::new(caller, ReserveOptions::new("Graph Compression"));
    /// ```
    #[must_use]
    pub const fn new(caller: Identity, options: ReserveOptions) -> Self {
        Self { caller, options }
    }

    /// Builds an operation plan for this reservation request.
    ///
    /// The reads here produce early, well-typed failures; the guarded
    /// updates re-check both preconditions inside the executor's
    /// transaction, so a plan built on state that changes before
    /// execution still fails without effect.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not a student (`PermissionDenied`)
    /// - The topic does not exist (`NotFound`)
    /// - The topic is already held, or the caller already holds a
    ///   reservation (`Conflict`, indistinguishable by design)
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        self.caller.require_role(Role::Student)?;

        let title = &self.options.title;
        let topic = Database::get_topic_by_title(conn, title)?.ok_or_else(|| Error::NotFound {
            resource: format!("topic '{title}'"),
        })?;
        if topic.reserved_by().is_some() {
            return Err(reserve_conflict(title));
        }

        let profile = Database::get_student_profile(conn, &self.caller.username)?.ok_or_else(
            || Error::NotFound {
                resource: format!("student profile '{}'", self.caller.username),
            },
        )?;
        if profile.current_reservation.is_some() {
            return Err(reserve_conflict(title));
        }

        let plan = OperationPlan::new(format!(
            "Reserve topic '{title}' for {}",
            self.caller.username
        ))
        .add_action(PlanAction::ClaimTopic {
            title: title.clone(),
            student: self.caller.username.clone(),
        })
        .add_action(PlanAction::ClaimStudentSlot {
            username: self.caller.username.clone(),
            title: title.clone(),
        });

        Ok(plan)
    }
}
