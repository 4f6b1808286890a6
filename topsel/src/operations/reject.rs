//! Reject operation planning.
//!
//! The owning teacher cancels a pending reservation: the topic returns
//! to open and the holder's slot frees up. This is the state's path back
//! to open that the holder does not initiate. Confirmed reservations
//! cannot be rejected.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};

use super::plan::{OperationPlan, PlanAction};

/// Options for a reject operation.
#[derive(Debug, Clone)]
pub struct RejectOptions {
    /// The title of the topic whose reservation is rejected.
    pub title: String,
}

impl RejectOptions {
    /// Creates a new `RejectOptions` for the given topic title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// A reject plan generator.
pub struct RejectPlan {
    caller: Identity,
    options: RejectOptions,
}

impl RejectPlan {
    /// Creates a new reject plan for the given caller and options.
    #[must_use]
    pub const fn new(caller: Identity, options: RejectOptions) -> Self {
        Self { caller, options }
    }

    /// Builds an operation plan for this rejection.
    ///
    /// The student-side clear is keyed by title, not by the holder read
    /// here, so a holder change between planning and execution cannot
    /// strand a pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not a teacher (`PermissionDenied`)
    /// - The topic does not exist (`NotFound`)
    /// - The topic is owned by another teacher (`PermissionDenied`)
    /// - The reservation is already confirmed (`Conflict`)
    /// - Nobody holds the topic (`InvalidState`)
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        self.caller.require_role(Role::Teacher)?;

        let title = &self.options.title;
        let topic = Database::get_topic_by_title(conn, title)?.ok_or_else(|| Error::NotFound {
            resource: format!("topic '{title}'"),
        })?;
        if topic.owner() != self.caller.username {
            return Err(Error::PermissionDenied {
                details: format!("topic '{title}' is not owned by {}", self.caller.username),
            });
        }
        if topic.final_student().is_some() {
            return Err(Error::Conflict {
                details: format!("reservation on '{title}' is already confirmed"),
            });
        }
        if topic.reserved_by().is_none() {
            return Err(Error::InvalidState {
                details: format!("topic '{title}' has no pending reservation"),
            });
        }

        let plan = OperationPlan::new(format!("Reject the reservation on '{title}'"))
            .add_action(PlanAction::ReleaseTopic {
                title: title.clone(),
            })
            .add_action(PlanAction::DetachHolders {
                title: title.clone(),
            });

        Ok(plan)
    }
}
