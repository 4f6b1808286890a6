//! Caller identity and role types.
//!
//! Every engine operation takes a resolved [`Identity`]: the account
//! directory turns a session token into `{username, role}` and the engine
//! checks the role once at its permission boundary. Roles are a closed
//! enum; string comparison never decides permissions.

use crate::error::{Error, Result};

/// Access role attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A student: may reserve and withdraw topics.
    Student,
    /// A teacher: may publish, confirm, reject and delete own topics.
    Teacher,
    /// An administrator: manages accounts and notices, has no topic powers.
    Admin,
}

impl Role {
    /// Returns the canonical lowercase name used in storage and tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = InvalidRoleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            other => Err(InvalidRoleError {
                value: other.to_string(),
            }),
        }
    }
}

/// Error type for unrecognized role names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRoleError {
    /// The string that was not a recognized role.
    pub value: String,
}

impl std::fmt::Display for InvalidRoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid role '{}': expected student, teacher or admin",
            self.value
        )
    }
}

impl std::error::Error for InvalidRoleError {}

/// A resolved caller identity.
///
/// Produced by an [`AccountDirectory`] from a session token and passed
/// into every engine operation.
///
/// # Examples
///
/// ```
/// use topsel::{Identity, Role};
///
/// let caller = Identity::new("s1", Role::Student);
/// assert!(caller.require_role(Role::Student).is_ok());
/// assert!(caller.require_role(Role::Teacher).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The account username.
    pub username: String,
    /// The account role.
    pub role: Role,
}

impl Identity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    /// Requires that the caller holds exactly the given role.
    ///
    /// Roles do not subsume each other: an admin is not a teacher and a
    /// teacher is not a student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] if the caller's role differs.
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::PermissionDenied {
                details: format!("operation requires role '{}', caller is '{}'", role, self.role),
            })
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

/// Resolves session tokens to caller identities.
///
/// The engine trusts the directory and performs no credential checks of
/// its own. The library ships a token-backed implementation in
/// [`crate::directory`]; tests may substitute their own.
pub trait AccountDirectory {
    /// Resolves a session token to an identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] if the token is missing, invalid
    /// or expired.
    fn resolve(&self, token: &str) -> Result<Identity>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            let parsed = Role::from_str(role.as_str()).unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        let err = Role::from_str("principal").unwrap_err();
        assert_eq!(err.value, "principal");
        let display = format!("{err}");
        assert!(display.contains("invalid role"));
        assert!(display.contains("principal"));
    }

    #[test]
    fn test_role_parse_is_case_sensitive() {
        assert!(Role::from_str("Student").is_err());
        assert!(Role::from_str("TEACHER").is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(format!("{}", Role::Student), "student");
        assert_eq!(format!("{}", Role::Teacher), "teacher");
        assert_eq!(format!("{}", Role::Admin), "admin");
    }

    #[test]
    fn test_require_role_matches() {
        let caller = Identity::new("t1", Role::Teacher);
        assert!(caller.require_role(Role::Teacher).is_ok());
    }

    #[test]
    fn test_require_role_rejects_other_roles() {
        let caller = Identity::new("admin", Role::Admin);
        let err = caller.require_role(Role::Teacher).unwrap_err();
        assert!(err.is_permission_denied());
        let display = format!("{err}");
        assert!(display.contains("teacher"));
        assert!(display.contains("admin"));
    }

    #[test]
    fn test_identity_display() {
        let caller = Identity::new("s1", Role::Student);
        assert_eq!(format!("{caller}"), "s1 (student)");
    }
}
