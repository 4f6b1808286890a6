//! Database query and update primitives for the topic store.
//!
//! This module implements the row-level reads and conditional updates the
//! reservation engine composes into transactions, plus the account,
//! profile and notice rows owned by the directory and the notice board.
//! Every function takes a plain connection so it can run inside a caller's
//! transaction; none of them begin or commit transactions themselves.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::directory::AccountRecord;
use crate::error::{Error, Result};
use crate::notice::{Notice, NoticeDraft};
use crate::profile::{StudentProfile, TeacherProfile};
use crate::topic::{OwnedTopicStatus, Topic, TopicDraft, TopicSummary};

use super::connection::Database;

/// Error used when a stored timestamp cannot be represented.
#[derive(Debug)]
struct TimestampOutOfRange {
    secs: i64,
}

impl std::fmt::Display for TimestampOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timestamp {} out of range", self.secs)
    }
}

impl std::error::Error for TimestampOutOfRange {}

/// Converts Unix epoch seconds from the database to a UTC timestamp.
pub(super) fn unix_secs_to_datetime(secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| rusqlite::Error::ToSqlConversionFailure(Box::new(TimestampOutOfRange { secs })))
}

/// Helper function to deserialize a topic from a database row.
///
/// Expects row fields in this order: id, title, owner, `required_major`,
/// content, availability, `confirmation_state`, `reserved_by`,
/// `final_student`, `created_at`
fn row_to_topic(row: &rusqlite::Row<'_>) -> rusqlite::Result<Topic> {
    let availability_str: String = row.get(5)?;
    let availability = availability_str
        .parse()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let confirmation_str: String = row.get(6)?;
    let confirmation_state = confirmation_str
        .parse()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let created_secs: i64 = row.get(9)?;

    Ok(Topic {
        id: row.get(0)?,
        title: row.get(1)?,
        owner: row.get(2)?,
        required_major: row.get(3)?,
        content: row.get(4)?,
        availability,
        confirmation_state,
        reserved_by: row.get(7)?,
        final_student: row.get(8)?,
        created_at: unix_secs_to_datetime(created_secs)?,
    })
}

/// Helper function to deserialize a student profile from a database row.
///
/// Expects row fields in this order: username, `display_name`, major,
/// `class_name`, email, phone, `current_reservation`, `final_reservation`
fn row_to_student_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudentProfile> {
    Ok(StudentProfile {
        username: row.get(0)?,
        display_name: row.get(1)?,
        major: row.get(2)?,
        class_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        current_reservation: row.get(6)?,
        final_reservation: row.get(7)?,
    })
}

/// Helper function to deserialize a teacher profile from a database row.
///
/// Expects row fields in this order: username, `display_name`, email,
/// phone, office
fn row_to_teacher_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<TeacherProfile> {
    Ok(TeacherProfile {
        username: row.get(0)?,
        display_name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        office: row.get(4)?,
    })
}

/// Helper for the topic/teacher join rows produced by listings.
///
/// Expects the ten topic fields first, then the five teacher fields.
fn row_to_topic_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<TopicSummary> {
    let topic = row_to_topic(row)?;
    let teacher = TeacherProfile {
        username: row.get(10)?,
        display_name: row.get(11)?,
        email: row.get(12)?,
        phone: row.get(13)?,
        office: row.get(14)?,
    };
    Ok(TopicSummary { topic, teacher })
}

/// Helper for the topic/holder join rows of the teacher dashboard.
///
/// The student columns come from a LEFT JOIN and are all NULL when the
/// topic is unreserved.
fn row_to_owned_topic_status(row: &rusqlite::Row<'_>) -> rusqlite::Result<OwnedTopicStatus> {
    let topic = row_to_topic(row)?;
    let holder_username: Option<String> = row.get(10)?;
    let holder = match holder_username {
        Some(username) => Some(StudentProfile {
            username,
            display_name: row.get(11)?,
            major: row.get(12)?,
            class_name: row.get(13)?,
            email: row.get(14)?,
            phone: row.get(15)?,
            current_reservation: row.get(16)?,
            final_reservation: row.get(17)?,
        }),
        None => None,
    };
    Ok(OwnedTopicStatus { topic, holder })
}

/// Helper function to deserialize a notice from a database row.
fn row_to_notice(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notice> {
    let posted_secs: i64 = row.get(4)?;
    Ok(Notice {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        author: row.get(3)?,
        posted_at: unix_secs_to_datetime(posted_secs)?,
    })
}

/// Helper function to deserialize an account row.
fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccountRecord> {
    let role_str: String = row.get(2)?;
    let role = role_str
        .parse()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let created_secs: i64 = row.get(3)?;
    Ok(AccountRecord {
        username: row.get(0)?,
        password_hash: row.get(1)?,
        role,
        created_at: unix_secs_to_datetime(created_secs)?,
    })
}

// SQL statements for the topic store

const INSERT_TOPIC: &str = r"
    INSERT INTO topics (title, owner, required_major, content, created_at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_TOPIC_BY_TITLE: &str = r"
    SELECT id, title, owner, required_major, content, availability,
           confirmation_state, reserved_by, final_student, created_at
    FROM topics
    WHERE title = ?
";

const SELECT_TOPIC_BY_HOLDER: &str = r"
    SELECT id, title, owner, required_major, content, availability,
           confirmation_state, reserved_by, final_student, created_at
    FROM topics
    WHERE reserved_by = ?
";

const LIST_TOPIC_SUMMARIES: &str = r"
    SELECT t.id, t.title, t.owner, t.required_major, t.content, t.availability,
           t.confirmation_state, t.reserved_by, t.final_student, t.created_at,
           te.username, te.display_name, te.email, te.phone, te.office
    FROM topics t
    JOIN teachers te ON te.username = t.owner
    ORDER BY t.title
";

const SEARCH_TOPIC_SUMMARIES: &str = r"
    SELECT t.id, t.title, t.owner, t.required_major, t.content, t.availability,
           t.confirmation_state, t.reserved_by, t.final_student, t.created_at,
           te.username, te.display_name, te.email, te.phone, te.office
    FROM topics t
    JOIN teachers te ON te.username = t.owner
    WHERE te.display_name LIKE '%' || ? || '%' ESCAPE '\'
    ORDER BY t.title
";

const SELECT_TOPIC_SUMMARY_BY_TITLE: &str = r"
    SELECT t.id, t.title, t.owner, t.required_major, t.content, t.availability,
           t.confirmation_state, t.reserved_by, t.final_student, t.created_at,
           te.username, te.display_name, te.email, te.phone, te.office
    FROM topics t
    JOIN teachers te ON te.username = t.owner
    WHERE t.title = ?
";

const SELECT_OWNED_TOPIC_STATUS: &str = r"
    SELECT t.id, t.title, t.owner, t.required_major, t.content, t.availability,
           t.confirmation_state, t.reserved_by, t.final_student, t.created_at,
           s.username, s.display_name, s.major, s.class_name, s.email, s.phone,
           s.current_reservation, s.final_reservation
    FROM topics t
    LEFT JOIN students s ON s.username = t.reserved_by
    WHERE t.owner = ?
    ORDER BY t.title
";

const COUNT_TOPICS_BY_OWNER: &str = "SELECT COUNT(*) FROM topics WHERE owner = ?";

const CLAIM_TOPIC: &str = r"
    UPDATE topics
    SET reserved_by = ?, availability = 'unavailable', confirmation_state = 'pending'
    WHERE title = ? AND reserved_by IS NULL
";

const RELEASE_HELD_TOPIC: &str = r"
    UPDATE topics
    SET reserved_by = NULL, availability = 'open', confirmation_state = 'pending'
    WHERE reserved_by = ? AND confirmation_state = 'pending'
";

const RELEASE_TOPIC_BY_TITLE: &str = r"
    UPDATE topics
    SET reserved_by = NULL, availability = 'open', confirmation_state = 'pending'
    WHERE title = ? AND reserved_by IS NOT NULL AND confirmation_state = 'pending'
";

const CONFIRM_TOPIC: &str = r"
    UPDATE topics
    SET final_student = ?, confirmation_state = 'confirmed'
    WHERE title = ? AND reserved_by = ? AND final_student IS NULL
";

const DELETE_TOPIC: &str = r"
    DELETE FROM topics
    WHERE title = ? AND final_student IS NULL
";

// SQL statements for the student-side reservation pointers

const CLAIM_STUDENT_SLOT: &str = r"
    UPDATE students
    SET current_reservation = ?
    WHERE username = ? AND current_reservation IS NULL
";

const CLEAR_STUDENT_CURRENT: &str = r"
    UPDATE students
    SET current_reservation = NULL
    WHERE username = ?
";

const SET_STUDENT_FINAL: &str = r"
    UPDATE students
    SET final_reservation = ?
    WHERE username = ?
";

const CLEAR_CURRENT_POINTERS_TO_TOPIC: &str = r"
    UPDATE students
    SET current_reservation = NULL
    WHERE current_reservation = ?
";

const CLEAR_FINAL_POINTERS_TO_TOPIC: &str = r"
    UPDATE students
    SET final_reservation = NULL
    WHERE final_reservation = ?
";

// SQL statements for profiles, accounts and notices

const SELECT_STUDENT_PROFILE: &str = r"
    SELECT username, display_name, major, class_name, email, phone,
           current_reservation, final_reservation
    FROM students
    WHERE username = ?
";

const SELECT_TEACHER_PROFILE: &str = r"
    SELECT username, display_name, email, phone, office
    FROM teachers
    WHERE username = ?
";

const INSERT_STUDENT_PROFILE: &str = r"
    INSERT INTO students (username, display_name, major, class_name, email, phone)
    VALUES (?, ?, ?, ?, ?, ?)
";

const INSERT_TEACHER_PROFILE: &str = r"
    INSERT INTO teachers (username, display_name, email, phone, office)
    VALUES (?, ?, ?, ?, ?)
";

const DELETE_STUDENT_PROFILE: &str = "DELETE FROM students WHERE username = ?";

const DELETE_TEACHER_PROFILE: &str = "DELETE FROM teachers WHERE username = ?";

const UPDATE_STUDENT_CONTACT: &str = r"
    UPDATE students
    SET email = ?, phone = ?
    WHERE username = ?
";

const UPDATE_TEACHER_CONTACT: &str = r"
    UPDATE teachers
    SET email = ?, phone = ?, office = ?
    WHERE username = ?
";

const INSERT_ACCOUNT: &str = r"
    INSERT INTO accounts (username, password_hash, role, created_at)
    VALUES (?, ?, ?, ?)
";

const SELECT_ACCOUNT: &str = r"
    SELECT username, password_hash, role, created_at
    FROM accounts
    WHERE username = ?
";

const DELETE_ACCOUNT: &str = "DELETE FROM accounts WHERE username = ?";

const UPDATE_ACCOUNT_PASSWORD: &str = r"
    UPDATE accounts
    SET password_hash = ?
    WHERE username = ?
";

const INSERT_NOTICE: &str = r"
    INSERT INTO notices (title, body, author, posted_at)
    VALUES (?, ?, ?, ?)
";

const LIST_NOTICES: &str = r"
    SELECT id, title, body, author, posted_at
    FROM notices
    ORDER BY posted_at DESC, id DESC
";

const DELETE_NOTICE: &str = "DELETE FROM notices WHERE id = ?";

/// Escapes LIKE wildcards so a search fragment matches literally.
fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Database {
    /// Inserts a new open topic and returns the stored row.
    ///
    /// The title uniqueness check is the table's UNIQUE constraint, so a
    /// racing duplicate publish loses at the store, not at a pre-check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] if a topic with the same title exists,
    /// or a database error for any other failure.
    pub(crate) fn insert_topic(
        conn: &Connection,
        draft: &TopicDraft,
        owner: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Topic> {
        let created_secs = created_at.timestamp();
        let inserted = conn.execute(
            INSERT_TOPIC,
            params![
                draft.title(),
                owner,
                draft.required_major(),
                draft.content(),
                created_secs,
            ],
        );
        if let Err(e) = inserted {
            let err = Error::from(e);
            if err.is_constraint_violation() {
                return Err(Error::Duplicate {
                    resource: format!("topic title '{}'", draft.title()),
                });
            }
            return Err(err);
        }

        Ok(Topic {
            id: conn.last_insert_rowid(),
            title: draft.title().to_string(),
            owner: owner.to_string(),
            required_major: draft.required_major().to_string(),
            content: draft.content().to_string(),
            availability: crate::topic::Availability::Open,
            confirmation_state: crate::topic::ConfirmationState::Pending,
            reserved_by: None,
            final_student: None,
            created_at: unix_secs_to_datetime(created_secs)?,
        })
    }

    /// Retrieves a topic by its unique title.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than "not found").
    ///
    /// # Returns
    ///
    /// - `Ok(Some(topic))` if the topic exists
    /// - `Ok(None)` if the topic doesn't exist
    /// - `Err(_)` if a database error occurs
    pub fn get_topic_by_title(conn: &Connection, title: &str) -> Result<Option<Topic>> {
        let mut stmt = conn.prepare(SELECT_TOPIC_BY_TITLE)?;
        match stmt.query_row(params![title], row_to_topic) {
            Ok(topic) => Ok(Some(topic)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves the topic currently held by the given student, if any.
    ///
    /// At most one row can match while the reservation invariants hold.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than "not found").
    pub fn get_topic_by_holder(conn: &Connection, student: &str) -> Result<Option<Topic>> {
        let mut stmt = conn.prepare(SELECT_TOPIC_BY_HOLDER)?;
        match stmt.query_row(params![student], row_to_topic) {
            Ok(topic) => Ok(Some(topic)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists all topics joined with their owning teacher's contact profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be deserialized.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use topsel::database::{Database, DatabaseConfig};
    ///
    /// let config = DatabaseConfig::new("/tmp/topsel.db");
    /// let db = Database::open(config).unwrap();
    ///
    /// let summaries = Database::list_topic_summaries(db.connection()).unwrap();
    /// for summary in summaries {
    ///     println!("{} ({})", summary.topic.title(), summary.teacher.display_name);
    /// }
    /// ```
    pub fn list_topic_summaries(conn: &Connection) -> Result<Vec<TopicSummary>> {
        let mut stmt = conn.prepare(LIST_TOPIC_SUMMARIES)?;
        let summaries = stmt
            .query_map([], row_to_topic_summary)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(summaries)
    }

    /// Lists topics whose owning teacher's display name contains the fragment.
    ///
    /// Matching is a literal substring match; LIKE wildcards in the
    /// fragment are escaped. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be deserialized.
    pub fn search_topic_summaries(conn: &Connection, fragment: &str) -> Result<Vec<TopicSummary>> {
        let mut stmt = conn.prepare(SEARCH_TOPIC_SUMMARIES)?;
        let summaries = stmt
            .query_map(params![escape_like(fragment)], row_to_topic_summary)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(summaries)
    }

    /// Retrieves a single topic/teacher summary by topic title.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than "not found").
    pub fn get_topic_summary_by_title(
        conn: &Connection,
        title: &str,
    ) -> Result<Option<TopicSummary>> {
        let mut stmt = conn.prepare(SELECT_TOPIC_SUMMARY_BY_TITLE)?;
        match stmt.query_row(params![title], row_to_topic_summary) {
            Ok(summary) => Ok(Some(summary)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists a teacher's topics with the holding student's profile, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be deserialized.
    pub fn list_owned_topic_status(
        conn: &Connection,
        owner: &str,
    ) -> Result<Vec<OwnedTopicStatus>> {
        let mut stmt = conn.prepare(SELECT_OWNED_TOPIC_STATUS)?;
        let rows = stmt
            .query_map(params![owner], row_to_owned_topic_status)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(rows)
    }

    /// Counts the topics owned by a teacher.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_topics_by_owner(conn: &Connection, owner: &str) -> Result<i64> {
        let count: i64 = conn.query_row(COUNT_TOPICS_BY_OWNER, params![owner], |row| row.get(0))?;
        Ok(count)
    }

    /// Marks a topic reserved by the student, if it is still open.
    ///
    /// Returns false without modifying anything when the topic does not
    /// exist or is already held; the WHERE guard is the precondition check.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn claim_topic(conn: &Connection, title: &str, student: &str) -> Result<bool> {
        let rows_affected = conn.execute(CLAIM_TOPIC, params![student, title])?;
        Ok(rows_affected > 0)
    }

    /// Releases whatever pending topic the student holds.
    ///
    /// Confirmed holdings are not released.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn release_held_topic(conn: &Connection, student: &str) -> Result<bool> {
        let rows_affected = conn.execute(RELEASE_HELD_TOPIC, params![student])?;
        Ok(rows_affected > 0)
    }

    /// Releases a pending reservation on the named topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn release_topic(conn: &Connection, title: &str) -> Result<bool> {
        let rows_affected = conn.execute(RELEASE_TOPIC_BY_TITLE, params![title])?;
        Ok(rows_affected > 0)
    }

    /// Finalizes a reservation, guarded on the expected holder.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn confirm_topic(conn: &Connection, title: &str, student: &str) -> Result<bool> {
        let rows_affected = conn.execute(CONFIRM_TOPIC, params![student, title, student])?;
        Ok(rows_affected > 0)
    }

    /// Deletes a topic row by title.
    ///
    /// Confirmed topics are not deletable; the WHERE guard makes the
    /// delete a no-op once `final_student` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub(crate) fn delete_topic(conn: &Connection, title: &str) -> Result<bool> {
        let rows_affected = conn.execute(DELETE_TOPIC, params![title])?;
        Ok(rows_affected > 0)
    }

    /// Clears the current-reservation pointer of whoever holds the topic.
    ///
    /// Keyed by title rather than by username so a holder change between
    /// read and write cannot strand a pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn detach_current_holders(conn: &Connection, title: &str) -> Result<()> {
        conn.execute(CLEAR_CURRENT_POINTERS_TO_TOPIC, params![title])?;
        Ok(())
    }

    /// Points the student's current reservation at the title, if free.
    ///
    /// Returns false when the student does not exist or already holds a
    /// reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn claim_student_slot(
        conn: &Connection,
        username: &str,
        title: &str,
    ) -> Result<bool> {
        let rows_affected = conn.execute(CLAIM_STUDENT_SLOT, params![title, username])?;
        Ok(rows_affected > 0)
    }

    /// Clears the student's current reservation pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn clear_student_reservation(conn: &Connection, username: &str) -> Result<bool> {
        let rows_affected = conn.execute(CLEAR_STUDENT_CURRENT, params![username])?;
        Ok(rows_affected > 0)
    }

    /// Sets the student's final reservation pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn set_student_final(
        conn: &Connection,
        username: &str,
        title: &str,
    ) -> Result<bool> {
        let rows_affected = conn.execute(SET_STUDENT_FINAL, params![title, username])?;
        Ok(rows_affected > 0)
    }

    /// Clears every student pointer referencing the topic title.
    ///
    /// Run inside the same transaction as a topic delete so no student is
    /// left pointing at a missing row.
    ///
    /// # Errors
    ///
    /// Returns an error if either update fails.
    pub(crate) fn clear_reservation_pointers(conn: &Connection, title: &str) -> Result<()> {
        conn.execute(CLEAR_CURRENT_POINTERS_TO_TOPIC, params![title])?;
        conn.execute(CLEAR_FINAL_POINTERS_TO_TOPIC, params![title])?;
        Ok(())
    }

    /// Retrieves a student profile by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than "not found").
    pub fn get_student_profile(conn: &Connection, username: &str) -> Result<Option<StudentProfile>> {
        let mut stmt = conn.prepare(SELECT_STUDENT_PROFILE)?;
        match stmt.query_row(params![username], row_to_student_profile) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves a teacher profile by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than "not found").
    pub fn get_teacher_profile(conn: &Connection, username: &str) -> Result<Option<TeacherProfile>> {
        let mut stmt = conn.prepare(SELECT_TEACHER_PROFILE)?;
        match stmt.query_row(params![username], row_to_teacher_profile) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Inserts a student profile row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] if a profile already exists for the
    /// username.
    pub(crate) fn insert_student_profile(
        conn: &Connection,
        profile: &StudentProfile,
    ) -> Result<()> {
        conn.execute(
            INSERT_STUDENT_PROFILE,
            params![
                profile.username,
                profile.display_name,
                profile.major,
                profile.class_name,
                profile.email,
                profile.phone,
            ],
        )
        .map_err(|e| duplicate_on_constraint(e, || format!("student profile '{}'", profile.username)))?;
        Ok(())
    }

    /// Inserts a teacher profile row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] if a profile already exists for the
    /// username.
    pub(crate) fn insert_teacher_profile(
        conn: &Connection,
        profile: &TeacherProfile,
    ) -> Result<()> {
        conn.execute(
            INSERT_TEACHER_PROFILE,
            params![
                profile.username,
                profile.display_name,
                profile.email,
                profile.phone,
                profile.office,
            ],
        )
        .map_err(|e| duplicate_on_constraint(e, || format!("teacher profile '{}'", profile.username)))?;
        Ok(())
    }

    /// Deletes a student profile row.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub(crate) fn delete_student_profile(conn: &Connection, username: &str) -> Result<bool> {
        let rows_affected = conn.execute(DELETE_STUDENT_PROFILE, params![username])?;
        Ok(rows_affected > 0)
    }

    /// Deletes a teacher profile row.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub(crate) fn delete_teacher_profile(conn: &Connection, username: &str) -> Result<bool> {
        let rows_affected = conn.execute(DELETE_TEACHER_PROFILE, params![username])?;
        Ok(rows_affected > 0)
    }

    /// Replaces a student's contact fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn update_student_contact(
        conn: &Connection,
        username: &str,
        email: &str,
        phone: &str,
    ) -> Result<bool> {
        let rows_affected = conn.execute(UPDATE_STUDENT_CONTACT, params![email, phone, username])?;
        Ok(rows_affected > 0)
    }

    /// Replaces a teacher's contact fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn update_teacher_contact(
        conn: &Connection,
        username: &str,
        email: &str,
        phone: &str,
        office: &str,
    ) -> Result<bool> {
        let rows_affected =
            conn.execute(UPDATE_TEACHER_CONTACT, params![email, phone, office, username])?;
        Ok(rows_affected > 0)
    }

    /// Inserts an account row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] if the username is taken.
    pub(crate) fn insert_account(conn: &Connection, record: &AccountRecord) -> Result<()> {
        conn.execute(
            INSERT_ACCOUNT,
            params![
                record.username,
                record.password_hash,
                record.role.as_str(),
                record.created_at.timestamp(),
            ],
        )
        .map_err(|e| duplicate_on_constraint(e, || format!("account '{}'", record.username)))?;
        Ok(())
    }

    /// Retrieves an account row by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than "not found").
    pub(crate) fn get_account(conn: &Connection, username: &str) -> Result<Option<AccountRecord>> {
        let mut stmt = conn.prepare(SELECT_ACCOUNT)?;
        match stmt.query_row(params![username], row_to_account) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes an account row.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub(crate) fn delete_account(conn: &Connection, username: &str) -> Result<bool> {
        let rows_affected = conn.execute(DELETE_ACCOUNT, params![username])?;
        Ok(rows_affected > 0)
    }

    /// Replaces an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn update_account_password(
        conn: &Connection,
        username: &str,
        password_hash: &str,
    ) -> Result<bool> {
        let rows_affected =
            conn.execute(UPDATE_ACCOUNT_PASSWORD, params![password_hash, username])?;
        Ok(rows_affected > 0)
    }

    /// Inserts a notice and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub(crate) fn insert_notice(
        conn: &Connection,
        draft: &NoticeDraft,
        author: &str,
        posted_at: DateTime<Utc>,
    ) -> Result<Notice> {
        let posted_secs = posted_at.timestamp();
        conn.execute(
            INSERT_NOTICE,
            params![draft.title(), draft.body(), author, posted_secs],
        )?;
        Ok(Notice {
            id: conn.last_insert_rowid(),
            title: draft.title().to_string(),
            body: draft.body().to_string(),
            author: author.to_string(),
            posted_at: unix_secs_to_datetime(posted_secs)?,
        })
    }

    /// Lists all notices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notices(conn: &Connection) -> Result<Vec<Notice>> {
        let mut stmt = conn.prepare(LIST_NOTICES)?;
        let notices = stmt
            .query_map([], row_to_notice)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(notices)
    }

    /// Deletes a notice by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub(crate) fn delete_notice(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute(DELETE_NOTICE, params![id])?;
        Ok(rows_affected > 0)
    }

    /// Verifies database integrity using PRAGMA `integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns an error if the integrity check fails or detects corruption.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use topsel::database::{Database, DatabaseConfig};
    ///
    /// let config = DatabaseConfig::new("/tmp/topsel.db");
    /// let mut db = Database::open(config).unwrap();
    ///
    /// db.verify_integrity().unwrap();
    /// ```
    pub fn verify_integrity(&mut self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("Integrity check failed: {result}"),
            })
        }
    }
}

/// Translates a uniqueness violation into [`Error::Duplicate`].
fn duplicate_on_constraint(e: rusqlite::Error, resource: impl FnOnce() -> String) -> Error {
    let err = Error::from(e);
    if err.is_constraint_violation() {
        Error::Duplicate {
            resource: resource(),
        }
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, seed_student, seed_teacher, seed_topic,
    };
    use crate::topic::{Availability, ConfirmationState};

    #[test]
    fn test_insert_and_get_topic() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");

        let draft = TopicDraft::new("Graph Compression", "CS", "Survey and benchmarks").unwrap();
        let topic = Database::insert_topic(db.connection(), &draft, "t1", Utc::now()).unwrap();
        assert_eq!(topic.title(), "Graph Compression");
        assert_eq!(topic.availability(), Availability::Open);
        assert_eq!(topic.reserved_by(), None);

        let loaded = Database::get_topic_by_title(db.connection(), "Graph Compression")
            .unwrap()
            .unwrap();
        assert_eq!(loaded, topic);
    }

    #[test]
    fn test_insert_duplicate_title() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_teacher(db.connection(), "t2", "Prof. Wu");

        let draft = TopicDraft::new("X", "CS", "c").unwrap();
        Database::insert_topic(db.connection(), &draft, "t1", Utc::now()).unwrap();

        let err = Database::insert_topic(db.connection(), &draft, "t2", Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Duplicate { .. }));
    }

    #[test]
    fn test_get_topic_not_found() {
        let db = create_test_database();
        let result = Database::get_topic_by_title(db.connection(), "missing").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_claim_topic_then_claim_again() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_topic(db.connection(), "T1", "t1");

        assert!(Database::claim_topic(db.connection(), "T1", "s1").unwrap());

        let topic = Database::get_topic_by_title(db.connection(), "T1")
            .unwrap()
            .unwrap();
        assert_eq!(topic.reserved_by(), Some("s1"));
        assert_eq!(topic.availability(), Availability::Unavailable);

        // The guard makes the second claim a no-op
        assert!(!Database::claim_topic(db.connection(), "T1", "s2").unwrap());
        let topic = Database::get_topic_by_title(db.connection(), "T1")
            .unwrap()
            .unwrap();
        assert_eq!(topic.reserved_by(), Some("s1"));
    }

    #[test]
    fn test_claim_topic_missing_title() {
        let db = create_test_database();
        assert!(!Database::claim_topic(db.connection(), "missing", "s1").unwrap());
    }

    #[test]
    fn test_claim_student_slot_guard() {
        let db = create_test_database();
        seed_student(db.connection(), "s1", "Shen Yi");

        assert!(Database::claim_student_slot(db.connection(), "s1", "T1").unwrap());
        // Slot taken now
        assert!(!Database::claim_student_slot(db.connection(), "s1", "T2").unwrap());

        let profile = Database::get_student_profile(db.connection(), "s1")
            .unwrap()
            .unwrap();
        assert_eq!(profile.current_reservation.as_deref(), Some("T1"));
    }

    #[test]
    fn test_release_held_topic_skips_confirmed() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_topic(db.connection(), "T1", "t1");

        Database::claim_topic(db.connection(), "T1", "s1").unwrap();
        assert!(Database::confirm_topic(db.connection(), "T1", "s1").unwrap());

        // A confirmed holding must not be released
        assert!(!Database::release_held_topic(db.connection(), "s1").unwrap());
        let topic = Database::get_topic_by_title(db.connection(), "T1")
            .unwrap()
            .unwrap();
        assert_eq!(topic.reserved_by(), Some("s1"));
        assert_eq!(topic.confirmation_state(), ConfirmationState::Confirmed);
    }

    #[test]
    fn test_release_held_topic_pending() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_topic(db.connection(), "T1", "t1");
        Database::claim_topic(db.connection(), "T1", "s1").unwrap();

        assert!(Database::release_held_topic(db.connection(), "s1").unwrap());
        let topic = Database::get_topic_by_title(db.connection(), "T1")
            .unwrap()
            .unwrap();
        assert_eq!(topic.reserved_by(), None);
        assert_eq!(topic.availability(), Availability::Open);
    }

    #[test]
    fn test_confirm_topic_holder_mismatch() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_topic(db.connection(), "T1", "t1");
        Database::claim_topic(db.connection(), "T1", "s1").unwrap();

        assert!(!Database::confirm_topic(db.connection(), "T1", "s2").unwrap());
        // Double confirm is also a no-op
        assert!(Database::confirm_topic(db.connection(), "T1", "s1").unwrap());
        assert!(!Database::confirm_topic(db.connection(), "T1", "s1").unwrap());
    }

    #[test]
    fn test_release_topic_by_title() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_topic(db.connection(), "T1", "t1");
        Database::claim_topic(db.connection(), "T1", "s1").unwrap();

        assert!(Database::release_topic(db.connection(), "T1").unwrap());
        // Nothing held anymore
        assert!(!Database::release_topic(db.connection(), "T1").unwrap());
    }

    #[test]
    fn test_clear_reservation_pointers() {
        let db = create_test_database();
        seed_student(db.connection(), "s1", "Shen Yi");
        Database::claim_student_slot(db.connection(), "s1", "T1").unwrap();
        Database::set_student_final(db.connection(), "s1", "T1").unwrap();

        Database::clear_reservation_pointers(db.connection(), "T1").unwrap();

        let profile = Database::get_student_profile(db.connection(), "s1")
            .unwrap()
            .unwrap();
        assert_eq!(profile.current_reservation, None);
        assert_eq!(profile.final_reservation, None);
    }

    #[test]
    fn test_list_topic_summaries_joins_owner() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_teacher(db.connection(), "t2", "Prof. Wu");
        seed_topic(db.connection(), "B", "t2");
        seed_topic(db.connection(), "A", "t1");

        let summaries = Database::list_topic_summaries(db.connection()).unwrap();
        assert_eq!(summaries.len(), 2);
        // Ordered by title
        assert_eq!(summaries[0].topic.title(), "A");
        assert_eq!(summaries[0].teacher.display_name, "Prof. Tang");
        assert_eq!(summaries[1].topic.title(), "B");
        assert_eq!(summaries[1].teacher.display_name, "Prof. Wu");
    }

    #[test]
    fn test_search_topic_summaries_substring() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_teacher(db.connection(), "t2", "Prof. Wu");
        seed_topic(db.connection(), "A", "t1");
        seed_topic(db.connection(), "B", "t2");

        let hits = Database::search_topic_summaries(db.connection(), "Tang").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].topic.title(), "A");

        let hits = Database::search_topic_summaries(db.connection(), "Prof").unwrap();
        assert_eq!(hits.len(), 2);

        let hits = Database::search_topic_summaries(db.connection(), "Zhou").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_escapes_like_wildcards() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "100% Tang");
        seed_teacher(db.connection(), "t2", "100x Tang");
        seed_topic(db.connection(), "A", "t1");
        seed_topic(db.connection(), "B", "t2");

        // A literal '%' must not act as a wildcard
        let hits = Database::search_topic_summaries(db.connection(), "100%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].teacher.display_name, "100% Tang");
    }

    #[test]
    fn test_list_owned_topic_status() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        seed_student(db.connection(), "s1", "Shen Yi");
        seed_topic(db.connection(), "A", "t1");
        seed_topic(db.connection(), "B", "t1");
        Database::claim_topic(db.connection(), "A", "s1").unwrap();

        let rows = Database::list_owned_topic_status(db.connection(), "t1").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].topic.title(), "A");
        assert_eq!(
            rows[0].holder.as_ref().map(|h| h.display_name.as_str()),
            Some("Shen Yi")
        );
        assert_eq!(rows[1].topic.title(), "B");
        assert!(rows[1].holder.is_none());
    }

    #[test]
    fn test_count_topics_by_owner() {
        let db = create_test_database();
        seed_teacher(db.connection(), "t1", "Prof. Tang");
        assert_eq!(Database::count_topics_by_owner(db.connection(), "t1").unwrap(), 0);

        seed_topic(db.connection(), "A", "t1");
        seed_topic(db.connection(), "B", "t1");
        assert_eq!(Database::count_topics_by_owner(db.connection(), "t1").unwrap(), 2);
    }

    #[test]
    fn test_account_round_trip() {
        use crate::identity::Role;

        let db = create_test_database();
        let record = AccountRecord {
            username: "admin".to_string(),
            password_hash: "$2b$04$fakehash".to_string(),
            role: Role::Admin,
            created_at: unix_secs_to_datetime(Utc::now().timestamp()).unwrap(),
        };

        Database::insert_account(db.connection(), &record).unwrap();

        let loaded = Database::get_account(db.connection(), "admin")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.username, "admin");
        assert_eq!(loaded.role, Role::Admin);
        assert_eq!(loaded.password_hash, "$2b$04$fakehash");

        // Duplicate username is rejected by the primary key
        let err = Database::insert_account(db.connection(), &record).unwrap_err();
        assert!(matches!(err, Error::Duplicate { .. }));

        assert!(Database::update_account_password(db.connection(), "admin", "newhash").unwrap());
        let loaded = Database::get_account(db.connection(), "admin")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.password_hash, "newhash");

        assert!(Database::delete_account(db.connection(), "admin").unwrap());
        assert!(Database::get_account(db.connection(), "admin")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_notice_round_trip() {
        let db = create_test_database();

        let draft = NoticeDraft::new("Deadline", "Selections close Friday.").unwrap();
        let notice =
            Database::insert_notice(db.connection(), &draft, "admin", Utc::now()).unwrap();
        assert_eq!(notice.title(), "Deadline");
        assert_eq!(notice.author(), "admin");

        let all = Database::list_notices(db.connection()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], notice);

        assert!(Database::delete_notice(db.connection(), notice.id()).unwrap());
        assert!(!Database::delete_notice(db.connection(), notice.id()).unwrap());
        assert!(Database::list_notices(db.connection()).unwrap().is_empty());
    }

    #[test]
    fn test_notices_listed_newest_first() {
        let db = create_test_database();

        let first = NoticeDraft::new("First", "a").unwrap();
        let second = NoticeDraft::new("Second", "b").unwrap();
        let base = Utc::now();
        Database::insert_notice(db.connection(), &first, "admin", base).unwrap();
        Database::insert_notice(
            db.connection(),
            &second,
            "admin",
            base + chrono::Duration::seconds(5),
        )
        .unwrap();

        let all = Database::list_notices(db.connection()).unwrap();
        assert_eq!(all[0].title(), "Second");
        assert_eq!(all[1].title(), "First");
    }

    #[test]
    fn test_verify_integrity() {
        let mut db = create_test_database();
        db.verify_integrity().unwrap();
    }
}
