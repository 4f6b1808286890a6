//! Profile rows for student and teacher accounts.
//!
//! Profiles are owned by the account directory; the reservation engine
//! only reads them when shaping results (teacher contact info on topic
//! listings, holder profiles on the teacher's dashboard) and writes the
//! two reservation pointers on the student side.

use serde::{Deserialize, Serialize};

/// A student's profile, including the two reservation pointers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// The account username.
    pub username: String,
    /// The student's display name.
    pub display_name: String,
    /// The student's major.
    pub major: String,
    /// The student's class name.
    pub class_name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Title of the topic the student currently holds, if any.
    pub current_reservation: Option<String>,
    /// Title of the topic confirmed for the student, if any.
    pub final_reservation: Option<String>,
}

/// A teacher's profile. All fields are public contact information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherProfile {
    /// The account username.
    pub username: String,
    /// The teacher's display name.
    pub display_name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Office location.
    pub office: String,
}
