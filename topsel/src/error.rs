//! Error types for the topsel library.
//!
//! This module provides the error hierarchy for all operations in the
//! topsel library, using `thiserror` for ergonomic error handling. The
//! variants mirror the failure taxonomy of the reservation engine:
//! callers match on the variant, not on message text.

use thiserror::Error;

/// Result type alias for operations that may fail with a topsel error.
///
/// # Examples
///
/// ```
/// use topsel::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the topsel library.
///
/// This enum encompasses all failure classes of the reservation engine
/// and its collaborators: the account directory, the notice board and
/// the underlying store.
#[derive(Debug, Error)]
pub enum Error {
    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A guarded precondition failed because another actor got there first.
    ///
    /// Reserve reports this without distinguishing "topic already taken"
    /// from "student already holds a reservation". Callers that need the
    /// cause must re-query.
    #[error("conflict: {details}")]
    Conflict {
        /// Details about the conflict.
        details: String,
    },

    /// The operation is not legal from the entity's current state.
    #[error("invalid state: {details}")]
    InvalidState {
        /// Details about the state violation.
        details: String,
    },

    /// A uniqueness constraint was violated.
    #[error("duplicate {resource}")]
    Duplicate {
        /// The resource that already exists.
        resource: String,
    },

    /// The caller does not have permission for this operation.
    #[error("permission denied: {details}")]
    PermissionDenied {
        /// Details about the denied operation.
        details: String,
    },

    /// The caller's session token could not be resolved to an identity.
    #[error("unauthenticated: {reason}")]
    Unauthenticated {
        /// The reason the caller is not authenticated.
        reason: String,
    },

    /// The store is temporarily unavailable due to lock contention.
    ///
    /// The operation had no effect and may be retried.
    #[error("store unavailable: {details}")]
    Unavailable {
        /// Details about the transient failure.
        details: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Password hashing or verification failed internally.
    #[error("password hashing failed: {details}")]
    PasswordHash {
        /// Details from the hashing backend.
        details: String,
    },

    /// Signing a session token failed.
    #[error("token signing failed: {details}")]
    TokenSigning {
        /// Details from the token backend.
        details: String,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The schema version this build expects.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        // Lock contention is transient: the transaction had no effect and
        // the caller may retry. Everything else is a real database error.
        if let rusqlite::Error::SqliteFailure(e, ref msg) = err {
            if matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) {
                return Self::Unavailable {
                    details: msg.clone().unwrap_or_else(|| e.to_string()),
                };
            }
        }
        Self::Database(err)
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHash {
            details: err.to_string(),
        }
    }
}

impl From<crate::topic::ValidationError> for Error {
    fn from(err: crate::topic::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if the error indicates a missing resource.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::Error;
    ///
    /// let err = Error::NotFound { resource: "topic 'Graph Compression'".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the error is a concurrency conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if the error reports a transient store failure.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Check if the error is permission-related.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsel::Error;
    ///
    /// let err = Error::PermissionDenied { details: "not the owner".into() };
    /// assert!(err.is_permission_denied());
    /// ```
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Check if the underlying database error is a uniqueness violation.
    ///
    /// Insert paths use this to translate store-level constraint failures
    /// into [`Error::Duplicate`].
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
