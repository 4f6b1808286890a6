//! Plan types for reservation operations.
//!
//! This module defines the plan structures that describe what actions
//! will be taken during an operation, without actually performing them.

use crate::topic::TopicDraft;

/// A single action to be taken during plan execution.
///
/// Each action corresponds to one guarded statement against the topic
/// store. The mutating actions re-check their preconditions in a WHERE
/// clause, so a plan built on stale state fails cleanly inside the
/// executor's transaction instead of half-applying.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Insert a new open topic owned by the teacher.
    CreateTopic {
        /// Validated topic fields.
        draft: TopicDraft,
        /// Username of the publishing teacher.
        owner: String,
    },

    /// Mark an open topic as held by the student.
    ClaimTopic {
        /// Title of the topic to claim.
        title: String,
        /// Username of the reserving student.
        student: String,
    },

    /// Point the student's free reservation slot at the topic.
    ClaimStudentSlot {
        /// Username of the reserving student.
        username: String,
        /// Title the slot will point at.
        title: String,
    },

    /// Release whatever pending topic the student currently holds.
    ReleaseStudentHolding {
        /// Username of the withdrawing student.
        student: String,
    },

    /// Clear the student's current-reservation pointer.
    ClearStudentReservation {
        /// Username of the student whose pointer is cleared.
        username: String,
    },

    /// Release the pending reservation on the named topic.
    ReleaseTopic {
        /// Title of the topic to release.
        title: String,
    },

    /// Clear the current-reservation pointer of whoever holds the topic.
    DetachHolders {
        /// Title whose holder pointers are cleared.
        title: String,
    },

    /// Finalize a reservation held by the expected student.
    ConfirmTopic {
        /// Title of the topic to confirm.
        title: String,
        /// Username the topic must still be held by.
        student: String,
    },

    /// Record the confirmed title on the student row.
    SetFinalReservation {
        /// Username of the confirmed student.
        username: String,
        /// The confirmed title.
        title: String,
    },

    /// Remove an unconfirmed topic row.
    DeleteTopic {
        /// Title of the topic to delete.
        title: String,
    },

    /// Clear every student pointer referencing a deleted topic.
    ClearReservationPointers {
        /// Title of the deleted topic.
        title: String,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTopic { draft, owner } => {
                format!("Create topic '{}' owned by {}", draft.title(), owner)
            }
            Self::ClaimTopic { title, student } => {
                format!("Reserve topic '{title}' for {student}")
            }
            Self::ClaimStudentSlot { username, title } => {
                format!("Point {username}'s reservation slot at '{title}'")
            }
            Self::ReleaseStudentHolding { student } => {
                format!("Release the topic held by {student}")
            }
            Self::ClearStudentReservation { username } => {
                format!("Clear {username}'s reservation pointer")
            }
            Self::ReleaseTopic { title } => {
                format!("Release the reservation on '{title}'")
            }
            Self::DetachHolders { title } => {
                format!("Detach holder pointers from '{title}'")
            }
            Self::ConfirmTopic { title, student } => {
                format!("Confirm '{title}' for {student}")
            }
            Self::SetFinalReservation { username, title } => {
                format!("Record '{title}' as {username}'s final reservation")
            }
            Self::DeleteTopic { title } => {
                format!("Delete topic '{title}'")
            }
            Self::ClearReservationPointers { title } => {
                format!("Clear reservation pointers to '{title}'")
            }
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of actions,
/// and any warnings that should be communicated to the user.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Reserve topic 'Graph Compression'");
    /// assert_eq!(plan.description, "Reserve topic 'Graph Compression'");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::{OperationPlan, PlanAction};
    ///
    /// let plan = OperationPlan::new("Test").add_action(PlanAction::ClaimTopic {
    ///     title: "Graph Compression".to_string(),
    ///     student: "s1".to_string(),
    /// });
    ///
    /// assert_eq!(plan.actions.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Test")
    ///     .add_warning("This is a warning");
    ///
    /// assert_eq!(plan.warnings.len(), 1);
    /// ```
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Test");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Property-based testing module
    // These tests verify structural properties of the plan builder
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        // Strategy to generate plausible topic titles
        fn title_strategy() -> impl Strategy<Value = String> {
            "[A-Za-z][A-Za-z0-9 ]{0,20}"
        }

        // PROPERTY: Actions preserve order
        // Actions are executed in the order they are added to the plan
        proptest! {
            #[test]
            fn prop_actions_preserve_order(
                title in title_strategy(),
                student in "[a-z][a-z0-9]{1,10}",
            ) {
                // PROPERTY: Actions are accumulated in the order added
                // This is critical for correct execution semantics
                let plan = OperationPlan::new("test")
                    .add_action(PlanAction::ClaimTopic {
                        title: title.clone(),
                        student: student.clone(),
                    })
                    .add_action(PlanAction::ClaimStudentSlot {
                        username: student,
                        title,
                    });

                prop_assert_eq!(plan.actions.len(), 2);
                prop_assert!(
                    matches!(plan.actions[0], PlanAction::ClaimTopic { .. }),
                    "expected ClaimTopic"
                );
                prop_assert!(
                    matches!(plan.actions[1], PlanAction::ClaimStudentSlot { .. }),
                    "expected ClaimStudentSlot"
                );
            }
        }

        // PROPERTY: Warning accumulation preserves order
        proptest! {
            #[test]
            fn prop_warnings_preserve_order(
                warning1 in "[a-z]{5,10}",
                warning2 in "[A-Z]{5,10}",
            ) {
                // PROPERTY: Warnings are accumulated in the order added
                // This is important for user-facing error reporting
                let plan = OperationPlan::new("test")
                    .add_warning(warning1.clone())
                    .add_warning(warning2.clone());

                prop_assert_eq!(plan.warnings.len(), 2);
                prop_assert_eq!(&plan.warnings[0], &warning1);
                prop_assert_eq!(&plan.warnings[1], &warning2);
            }
        }

        // PROPERTY: PlanAction descriptions are non-empty
        // Every action must have a meaningful description
        proptest! {
            #[test]
            fn prop_action_descriptions_nonempty(
                title in title_strategy(),
                student in "[a-z][a-z0-9]{1,10}",
            ) {
                // PROPERTY: All PlanAction descriptions produce non-empty strings
                // This ensures that all actions can be meaningfully logged/displayed
                let actions = vec![
                    PlanAction::ClaimTopic {
                        title: title.clone(),
                        student: student.clone(),
                    },
                    PlanAction::ReleaseTopic { title: title.clone() },
                    PlanAction::ConfirmTopic {
                        title: title.clone(),
                        student: student.clone(),
                    },
                    PlanAction::DeleteTopic { title: title.clone() },
                    PlanAction::ClearReservationPointers { title },
                ];

                for action in actions {
                    let desc = action.description();
                    prop_assert!(!desc.is_empty(), "action descriptions must be non-empty");
                }
            }
        }
    }

    #[test]
    fn test_plan_action_description() {
        let action = PlanAction::ClaimTopic {
            title: "Graph Compression".to_string(),
            student: "s1".to_string(),
        };
        let desc = action.description();
        assert!(desc.contains("Graph Compression"));
        assert!(desc.contains("s1"));
    }

    #[test]
    fn test_operation_plan_new() {
        let plan = OperationPlan::new("Test operation");
        assert_eq!(plan.description, "Test operation");
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn test_operation_plan_add_action() {
        let plan = OperationPlan::new("Test").add_action(PlanAction::DeleteTopic {
            title: "T1".to_string(),
        });

        assert_eq!(plan.len(), 1);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_operation_plan_add_warning() {
        let plan = OperationPlan::new("Test").add_warning("Test warning");

        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0], "Test warning");
    }

    #[test]
    fn test_operation_plan_builder_pattern() {
        let plan = OperationPlan::new("Test")
            .add_action(PlanAction::ReleaseTopic {
                title: "T1".to_string(),
            })
            .add_warning("Warning 1")
            .add_action(PlanAction::DetachHolders {
                title: "T1".to_string(),
            });

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.warnings.len(), 1);
    }
}
