//! Role-scoped dashboard views.
//!
//! A student sees the one topic they hold (current or confirmed); a
//! teacher sees every topic they own with its reservation status and
//! the holder's profile when there is one.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};
use crate::topic::{OwnedTopicStatus, TopicSummary};

/// Returns the caller's reservation joined with teacher contact info.
///
/// Prefers the current reservation; falls back to the final one so a
/// confirmed student still sees their topic.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a student (`PermissionDenied`)
/// - The caller has no student profile, holds no reservation, or the
///   referenced topic is gone (`NotFound`)
pub fn view_as_student(conn: &Connection, caller: &Identity) -> Result<TopicSummary> {
    caller.require_role(Role::Student)?;

    let username = &caller.username;
    let profile =
        Database::get_student_profile(conn, username)?.ok_or_else(|| Error::NotFound {
            resource: format!("student profile '{username}'"),
        })?;
    let title = profile
        .current_reservation
        .or(profile.final_reservation)
        .ok_or_else(|| Error::NotFound {
            resource: format!("reservation for student '{username}'"),
        })?;
    Database::get_topic_summary_by_title(conn, &title)?.ok_or_else(|| Error::NotFound {
        resource: format!("topic '{title}'"),
    })
}

/// Returns every topic the caller owns with its reservation status.
///
/// # Errors
///
/// Returns an error if the caller is not a teacher (`PermissionDenied`)
/// or the query fails. Owning no topics yields an empty list.
pub fn view_as_teacher(conn: &Connection, caller: &Identity) -> Result<Vec<OwnedTopicStatus>> {
    caller.require_role(Role::Teacher)?;
    Database::list_owned_topic_status(conn, &caller.username)
}
