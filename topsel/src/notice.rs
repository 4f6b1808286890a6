//! The notice board.
//!
//! Plain CRUD with no cross-entity consistency: admins post and delete,
//! everyone authenticated reads. Listing is newest-first.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};
use crate::topic::{trimmed_non_empty, ValidationError};

/// A notice posted by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) author: String,
    pub(crate) posted_at: DateTime<Utc>,
}

impl Notice {
    /// Returns the notice id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the notice title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the notice body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the username of the posting administrator.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the posting timestamp.
    #[must_use]
    pub const fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }
}

/// A validated draft for posting a notice.
///
/// # Examples
///
/// ```
/// use topsel::NoticeDraft;
///
/// let draft = NoticeDraft::new("Deadline", "Selections close Friday.").unwrap();
/// assert_eq!(draft.title(), "Deadline");
/// assert!(NoticeDraft::new("  ", "body").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeDraft {
    title: String,
    body: String,
}

impl NoticeDraft {
    /// Creates a validated draft. Both fields are trimmed and must be
    /// non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error if either field is empty after trimming.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        let title = trimmed_non_empty("title", title.into())?;
        let body = trimmed_non_empty("body", body.into())?;
        Ok(Self { title, body })
    }

    /// Returns the draft title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the draft body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Posts a notice and returns the stored row.
///
/// # Errors
///
/// Returns an error if the caller is not an admin (`PermissionDenied`)
/// or the insert fails.
pub fn post_notice(db: &mut Database, caller: &Identity, draft: &NoticeDraft) -> Result<Notice> {
    caller.require_role(Role::Admin)?;

    let tx = db
        .connection_mut()
        .transaction_with_behavior(TransactionBehavior::Immediate)?;
    let notice = Database::insert_notice(&tx, draft, &caller.username, Utc::now())?;
    tx.commit()?;
    Ok(notice)
}

/// Lists every notice, newest first.
///
/// # Errors
///
/// Returns an error only if the query fails.
pub fn list_notices(conn: &Connection) -> Result<Vec<Notice>> {
    Database::list_notices(conn)
}

/// Deletes a notice by id.
///
/// # Errors
///
/// Returns an error if the caller is not an admin (`PermissionDenied`)
/// or the notice does not exist (`NotFound`).
pub fn delete_notice(db: &mut Database, caller: &Identity, id: i64) -> Result<()> {
    caller.require_role(Role::Admin)?;

    let tx = db
        .connection_mut()
        .transaction_with_behavior(TransactionBehavior::Immediate)?;
    if !Database::delete_notice(&tx, id)? {
        return Err(Error::NotFound {
            resource: format!("notice {id}"),
        });
    }
    tx.commit()?;
    Ok(())
}
