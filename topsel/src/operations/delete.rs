//! Delete operation planning.
//!
//! The owning teacher removes a topic. A pending reservation does not
//! block deletion, but the holder's pointer is cleared in the same
//! transaction so no student is left pointing at a missing row.
//! Confirmed topics cannot be deleted.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};

use super::plan::{OperationPlan, PlanAction};

/// Options for a delete operation.
#[derive(Debug, Clone)]
pub struct DeleteOptions {
    /// The title of the topic to delete.
    pub title: String,
}

impl DeleteOptions {
    /// Creates a new `DeleteOptions` for the given topic title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// A delete plan generator.
pub struct DeletePlan {
    caller: Identity,
    options: DeleteOptions,
}

impl DeletePlan {
    /// Creates a new delete plan for the given caller and options.
    #[must_use]
    pub const fn new(caller: Identity, options: DeleteOptions) -> Self {
        Self { caller, options }
    }

    /// Builds an operation plan for this deletion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not a teacher (`PermissionDenied`)
    /// - The topic does not exist (`NotFound`)
    /// - The topic is owned by another teacher (`PermissionDenied`)
    /// - The reservation is confirmed (`InvalidState`)
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
            return Err(Error::InvalidState {
                details: format!(
                    "topic '{title}' has a confirmed reservation and cannot be deleted"
                ),
            });
        }

        let mut plan = OperationPlan::new(format!("Delete topic '{title}'"));
        if let Some(holder) = topic.reserved_by() {
            plan = plan.add_warning(format!(
                "Topic '{title}' is held by {holder}; the pending reservation will be cleared"
            ));
        }
        plan = plan
            .add_action(PlanAction::DeleteTopic {
                title: title.clone(),
            })
            .add_action(PlanAction::ClearReservationPointers {
                title: title.clone(),
            });

        Ok(plan)
    }
}
