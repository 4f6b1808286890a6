//! Confirm operation planning.
//!
//! The owning teacher finalizes a pending reservation. The teacher names
//! the student they intend to confirm by display name; the plan resolves
//! the topic's actual holder and the guarded update makes sure the hold
//! has not changed hands by commit time. Confirmation is terminal.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};

use super::plan::{OperationPlan, PlanAction};

/// Options for a confirm operation.
#[derive(Debug, Clone)]
pub struct ConfirmOptions {
    /// The title of the topic to confirm.
    pub title: String,

    /// The display name of the student the teacher intends to confirm.
    pub student_name: String,
}

impl ConfirmOptions {
    /// Creates a new `ConfirmOptions`.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::ConfirmOptions;
    ///
    /// let options = ConfirmOptions::new("Graph Compression", "Shen Yi");
    /// assert_eq!(options.student_name, "Shen Yi");
    /// ```
    #[must_use]
    pub fn new(title: impl Into<String>, student_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            student_name: student_name.into(),
        }
    }
}

/// A confirm plan generator.
pub struct ConfirmPlan {
    caller: Identity,
    options: ConfirmOptions,
}

impl ConfirmPlan {
    /// Creates a new confirm plan for the given caller and options.
    #[must_use]
    pub const fn new(caller: Identity, options: ConfirmOptions) -> Self {
        Self { caller, options }
    }

    /// Builds an operation plan for this confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not a teacher (`PermissionDenied`)
    /// - The topic does not exist (`NotFound`)
    /// - The topic is owned by another teacher (`PermissionDenied`)
    /// - The reservation is already confirmed, nobody holds the topic, or
    ///   the holder's display name is not the named student (`Conflict`)
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

        let holder = topic.reserved_by().ok_or_else(|| Error::Conflict {
            details: format!("topic '{title}' is not held by the expected student"),
        })?;
        let profile =
            Database::get_student_profile(conn, holder)?.ok_or_else(|| Error::NotFound {
                resource: format!("student profile '{holder}'"),
            })?;
        if profile.display_name != self.options.student_name {
            return Err(Error::Conflict {
                details: format!("topic '{title}' is not held by the expected student"),
            });
        }

        let plan = OperationPlan::new(format!(
            "Confirm '{title}' for {} ({holder})",
            self.options.student_name
        ))
        .add_action(PlanAction::ConfirmTopic {
            title: title.clone(),
            student: holder.to_string(),
        })
        .add_action(PlanAction::SetFinalReservation {
            username: holder.to_string(),
            title: title.clone(),
        });

        Ok(plan)
    }
}
