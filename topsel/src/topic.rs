//! Topic types for the reservation engine.
//!
//! This module provides the topic entity, its two state fields, the
//! validated draft used by publish, and the joined row shapes returned
//! by the listing and view operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::{StudentProfile, TeacherProfile};

/// Whether a topic can currently be reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    /// The topic is open for reservation.
    Open,
    /// The topic is held by exactly one student.
    Unavailable,
}

impl Availability {
    /// Returns the canonical lowercase name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Availability {
    type Err = InvalidStateNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(InvalidStateNameError {
                field: "availability",
                value: other.to_string(),
            }),
        }
    }
}

/// Whether a held reservation has been finalized by the owning teacher.
///
/// Meaningful only while a topic is reserved; open topics carry
/// `Pending` as a neutral default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfirmationState {
    /// The reservation (if any) awaits the teacher's decision.
    Pending,
    /// The reservation has been confirmed and is terminal.
    Confirmed,
}

impl ConfirmationState {
    /// Returns the canonical lowercase name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for ConfirmationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConfirmationState {
    type Err = InvalidStateNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            other => Err(InvalidStateNameError {
                field: "confirmation_state",
                value: other.to_string(),
            }),
        }
    }
}

/// Error type for unrecognized stored state names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStateNameError {
    /// The column the bad value came from.
    pub field: &'static str,
    /// The unrecognized value.
    pub value: String,
}

impl std::fmt::Display for InvalidStateNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value '{}'", self.field, self.value)
    }
}

impl std::error::Error for InvalidStateNameError {}

/// A reservable topic published by a teacher.
///
/// Topics move between open, reserved-pending and confirmed through the
/// engine operations; every mutation re-checks the state it transitions
/// from inside a single transaction.
///
/// # Examples
///
/// ```
/// use topsel::{Availability, ConfirmationState, TopicDraft};
///
/// let draft = TopicDraft::new("Graph Compression", "CS", "Survey and benchmarks").unwrap();
/// assert_eq!(draft.title(), "Graph Compression");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) owner: String,
    pub(crate) required_major: String,
    pub(crate) content: String,
    pub(crate) availability: Availability,
    pub(crate) confirmation_state: ConfirmationState,
    pub(crate) reserved_by: Option<String>,
    pub(crate) final_student: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl Topic {
    /// Returns the opaque row id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the unique title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the username of the publishing teacher.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the major the topic is aimed at.
    #[must_use]
    pub fn required_major(&self) -> &str {
        &self.required_major
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns whether the topic can currently be reserved.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        self.availability
    }

    /// Returns the confirmation state of the current reservation.
    #[must_use]
    pub const fn confirmation_state(&self) -> ConfirmationState {
        self.confirmation_state
    }

    /// Returns the username of the holding student, if reserved.
    #[must_use]
    pub fn reserved_by(&self) -> Option<&str> {
        self.reserved_by.as_deref()
    }

    /// Returns the username of the confirmed student, if confirmed.
    #[must_use]
    pub fn final_student(&self) -> Option<&str> {
        self.final_student.as_deref()
    }

    /// Returns the publication timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns true if the topic is held and the hold has been confirmed.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirmation_state == ConfirmationState::Confirmed && self.reserved_by.is_some()
    }
}

/// A validated draft for publishing a new topic.
///
/// All three fields are trimmed and must be non-empty.
///
/// # Examples
///
/// ```
/// use topsel::TopicDraft;
///
/// let draft = TopicDraft::new("  Graph Compression  ", "CS", "Survey").unwrap();
/// assert_eq!(draft.title(), "Graph Compression");
///
/// assert!(TopicDraft::new("", "CS", "Survey").is_err());
/// assert!(TopicDraft::new("T", "  ", "Survey").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDraft {
    title: String,
    required_major: String,
    content: String,
}

impl TopicDraft {
    /// Creates a validated draft.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is empty after trimming whitespace.
    pub fn new(
        title: impl Into<String>,
        required_major: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = trimmed_non_empty("title", title.into())?;
        let required_major = trimmed_non_empty("required_major", required_major.into())?;
        let content = trimmed_non_empty("content", content.into())?;
        Ok(Self {
            title,
            required_major,
            content,
        })
    }

    /// Returns the draft title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the draft major.
    #[must_use]
    pub fn required_major(&self) -> &str {
        &self.required_major
    }

    /// Returns the draft description.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Trims a field and rejects it when empty.
pub(crate) fn trimmed_non_empty(
    field: &'static str,
    value: String,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{field} must be non-empty after trimming whitespace"),
        });
    }
    Ok(trimmed.to_string())
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// A topic joined with its owning teacher's contact profile.
///
/// Returned by the list, search and student-view operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    /// The topic row.
    pub topic: Topic,
    /// The owning teacher's contact profile.
    pub teacher: TeacherProfile,
}

/// One row of a teacher's dashboard: an owned topic plus its holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedTopicStatus {
    /// The topic row.
    pub topic: Topic,
    /// The profile of the holding student, if the topic is reserved.
    pub holder: Option<StudentProfile>,
}
