//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use std::fmt;
use topsel::Error as LibError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Domain failure (conflict, duplicate, not found, permission)
    /// - 2: Store unavailable (lock timeout)
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err {
                LibError::Unavailable { .. } => 2,
                LibError::Conflict { .. }
                | LibError::Duplicate { .. }
                | LibError::NotFound { .. }
                | LibError::InvalidState { .. }
                | LibError::PermissionDenied { .. }
                | LibError::Unauthenticated { .. }
                | LibError::Validation { .. } => 1,
                _ => 6,
            },
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_failures_exit_one() {
        let errors = [
            LibError::Conflict {
                details: "taken".into(),
            },
            LibError::Duplicate {
                resource: "topic 'X'".into(),
            },
            LibError::NotFound {
                resource: "topic 'X'".into(),
            },
            LibError::PermissionDenied {
                details: "not the owner".into(),
            },
        ];
        for err in errors {
            assert_eq!(CliError::from(err).exit_code(), 1);
        }
    }

    #[test]
    fn test_unavailable_exits_two() {
        let err = LibError::Unavailable {
            details: "database is locked".into(),
        };
        assert_eq!(CliError::from(err).exit_code(), 2);
    }

    #[test]
    fn test_other_exit_codes() {
        assert_eq!(CliError::InvalidArguments("bad".into()).exit_code(), 4);
        assert_eq!(
            CliError::Io(std::io::Error::other("disk")).exit_code(),
            5
        );
        assert_eq!(CliError::Config("bad yaml".into()).exit_code(), 7);
    }
}
