//! Listing and search.
//!
//! Read-only operations over the topic store. Both are open to every
//! authenticated role and have no side effects; an empty result is a
//! normal outcome, not a failure.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::Result;
use crate::topic::TopicSummary;

/// Lists every topic joined with its owner's contact profile.
///
/// # Errors
///
/// Returns an error only if the underlying query fails.
pub fn list_topics(conn: &Connection) -> Result<Vec<TopicSummary>> {
    Database::list_topic_summaries(conn)
}

/// Lists topics whose owning teacher's display name contains the
/// fragment.
///
/// The match is a literal case-sensitive substring; `%` and `_` in the
/// fragment are not wildcards.
///
/// # Errors
///
/// Returns an error only if the underlying query fails.
pub fn search_topics(conn: &Connection, teacher_fragment: &str) -> Result<Vec<TopicSummary>> {
    Database::search_topic_summaries(conn, teacher_fragment)
}
