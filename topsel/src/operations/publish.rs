//! Publish operation planning.
//!
//! This module implements the planning logic for publishing a new topic:
//! field validation, the teacher role gate, and the single insert action.
//! Title uniqueness is not pre-checked here; the store's UNIQUE
//! constraint decides, so racing publishes of the same title cannot both
//! win.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};
use crate::topic::TopicDraft;

use super::plan::{OperationPlan, PlanAction};

/// Options for a publish operation.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// The title of the new topic.
    pub title: String,

    /// The major the topic is aimed at.
    pub required_major: String,

    /// The free-text description.
    pub content: String,
}

impl PublishOptions {
    /// Creates a new `PublishOptions` with the given fields.
    ///
    /// Fields are validated when the plan is built, not here.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::PublishOptions;
    ///
    /// let options = PublishOptions::new("Graph Compression", "CS", "Survey and benchmarks");
    /// assert_eq!(options.title, "Graph Compression");
    /// ```
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        required_major: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            required_major: required_major.into(),
            content: content.into(),
        }
    }
}

/// A publish plan generator.
pub struct PublishPlan {
    caller: Identity,
    options: PublishOptions,
}

impl PublishPlan {
    /// Creates a new publish plan for the given caller and options.
    #[must_use]
    pub const fn new(caller: Identity, options: PublishOptions) -> Self {
        Self { caller, options }
    }

    /// Builds an operation plan for this publish request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not a teacher (`PermissionDenied`)
    /// - A field is empty after trimming (`Validation`)
    /// - The caller has no teacher profile (`NotFound`)
    ///
    /// A title collision is not detected here; executing the plan reports
    /// `Duplicate` when the store rejects the insert.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        self.caller.require_role(Role::Teacher)?;

        let draft = TopicDraft::new(
            self.options.title.clone(),
            self.options.required_major.clone(),
            self.options.content.clone(),
        )?;

        // Listings join topics to their owner's profile, so an owner
        // without one would publish invisible topics.
        if Database::get_teacher_profile(conn, &self.caller.username)?.is_none() {
            return Err(Error::NotFound {
                resource: format!("teacher profile '{}'", self.caller.username),
            });
        }

        let plan = OperationPlan::new(format!(
            "Publish topic '{}' owned by {}",
            draft.title(),
            self.caller.username
        ))
        .add_action(PlanAction::CreateTopic {
            draft,
            owner: self.caller.username.clone(),
        });

        Ok(plan)
    }
}
