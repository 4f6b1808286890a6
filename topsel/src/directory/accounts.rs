//! Account lifecycle: create, delete, reset password, verify login.
//!
//! Every mutation here is admin-gated and runs as one immediate
//! transaction so the account row and its profile row never disagree.
//! Deleting an account that still participates in the reservation data
//! (a student holding a topic, a teacher owning topics) is refused.

use chrono::{DateTime, Utc};
use rusqlite::TransactionBehavior;
use serde::Serialize;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::identity::{Identity, Role};
use crate::profile::{StudentProfile, TeacherProfile};
use crate::topic::trimmed_non_empty;

/// One row of the accounts table.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// The unique login name.
    pub username: String,
    /// The bcrypt hash of the password.
    pub password_hash: String,
    /// The account role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Role-specific profile fields for a new account.
///
/// Admins have no profile row; students and teachers get one alongside
/// their account, created in the same transaction.
#[derive(Debug, Clone)]
pub enum AccountDetails {
    /// A student account with its profile fields.
    Student {
        /// The student's display name.
        display_name: String,
        /// The student's major.
        major: String,
        /// The student's class name.
        class_name: String,
        /// Contact email address.
        email: String,
        /// Contact phone number.
        phone: String,
    },
    /// A teacher account with its public contact fields.
    Teacher {
        /// The teacher's display name.
        display_name: String,
        /// Contact email address.
        email: String,
        /// Contact phone number.
        phone: String,
        /// Office location.
        office: String,
    },
    /// An administrator account. No profile row.
    Admin,
}

impl AccountDetails {
    /// Returns the role this profile shape implies.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Teacher { .. } => Role::Teacher,
            Self::Admin => Role::Admin,
        }
    }
}

/// A validated request to create an account.
///
/// # Examples
///
/// ```
/// use topsel::directory::{AccountDetails, NewAccount};
///
/// let account = NewAccount::new("s1", "hunter2", AccountDetails::Admin).unwrap();
/// assert_eq!(account.username(), "s1");
/// ```
#[derive(Debug, Clone)]
pub struct NewAccount {
    username: String,
    password: String,
    details: AccountDetails,
    bcrypt_cost: u32,
}

impl NewAccount {
    /// Creates a validated account request.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the username is empty after
    /// trimming or the password is empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        details: AccountDetails,
    ) -> Result<Self> {
        let username = trimmed_non_empty("username", username.into())?;
        let password = password.into();
        if password.is_empty() {
            return Err(Error::Validation {
                field: "password".into(),
                message: "password must be non-empty".into(),
            });
        }
        Ok(Self {
            username,
            password,
            details,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Overrides the bcrypt cost factor.
    ///
    /// Tests use the minimum cost; production callers keep the default.
    #[must_use]
    pub const fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Returns the requested username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the role the new account will hold.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.details.role()
    }
}

/// Creates an account and its profile row.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin (`PermissionDenied`)
/// - The username is already taken (`Duplicate`)
/// - Password hashing fails
pub fn create_account(db: &mut Database, caller: &Identity, account: &NewAccount) -> Result<()> {
    caller.require_role(Role::Admin)?;

    let password_hash = bcrypt::hash(&account.password, account.bcrypt_cost)?;
    let record = AccountRecord {
        username: account.username.clone(),
        password_hash,
        role: account.details.role(),
        created_at: Utc::now(),
    };

    let tx = db
        .connection_mut()
        .transaction_with_behavior(TransactionBehavior::Immediate)?;
    Database::insert_account(&tx, &record)?;
    match &account.details {
        AccountDetails::Student {
            display_name,
            major,
            class_name,
            email,
            phone,
        } => {
            let profile = StudentProfile {
                username: account.username.clone(),
                display_name: display_name.clone(),
                major: major.clone(),
                class_name: class_name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                current_reservation: None,
                final_reservation: None,
            };
            Database::insert_student_profile(&tx, &profile)?;
        }
        AccountDetails::Teacher {
            display_name,
            email,
            phone,
            office,
        } => {
            let profile = TeacherProfile {
                username: account.username.clone(),
                display_name: display_name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                office: office.clone(),
            };
            Database::insert_teacher_profile(&tx, &profile)?;
        }
        AccountDetails::Admin => {}
    }
    tx.commit()?;

    log::debug!("created {} account '{}'", record.role, record.username);
    Ok(())
}

/// Deletes an account and its profile row.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin (`PermissionDenied`)
/// - The account does not exist (`NotFound`)
/// - The account is a student holding a reservation, or a teacher that
///   still owns topics (`Conflict`)
pub fn delete_account(db: &mut Database, caller: &Identity, username: &str) -> Result<()> {
    caller.require_role(Role::Admin)?;

    let tx = db
        .connection_mut()
        .transaction_with_behavior(TransactionBehavior::Immediate)?;

    let record = Database::get_account(&tx, username)?.ok_or_else(|| Error::NotFound {
        resource: format!("account '{username}'"),
    })?;
    match record.role {
        Role::Student => {
            if Database::get_topic_by_holder(&tx, username)?.is_some() {
                return Err(Error::Conflict {
                    details: format!("student '{username}' still holds a reservation"),
                });
            }
            Database::delete_student_profile(&tx, username)?;
        }
        Role::Teacher => {
            if Database::count_topics_by_owner(&tx, username)? > 0 {
                return Err(Error::Conflict {
                    details: format!("teacher '{username}' still owns topics"),
                });
            }
            Database::delete_teacher_profile(&tx, username)?;
        }
        Role::Admin => {}
    }
    Database::delete_account(&tx, username)?;
    tx.commit()?;

    log::debug!("deleted {} account '{username}'", record.role);
    Ok(())
}

/// Replaces an account's password.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin (`PermissionDenied`)
/// - The new password is empty (`Validation`)
/// - The account does not exist (`NotFound`)
pub fn reset_password(
    db: &mut Database,
    caller: &Identity,
    username: &str,
    new_password: &str,
) -> Result<()> {
    caller.require_role(Role::Admin)?;

    if new_password.is_empty() {
        return Err(Error::Validation {
            field: "password".into(),
            message: "password must be non-empty".into(),
        });
    }
    let password_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)?;

    let tx = db
        .connection_mut()
        .transaction_with_behavior(TransactionBehavior::Immediate)?;
    if !Database::update_account_password(&tx, username, &password_hash)? {
        return Err(Error::NotFound {
            resource: format!("account '{username}'"),
        });
    }
    tx.commit()?;
    Ok(())
}

/// Verifies a username/password pair and returns the caller's identity.
///
/// Unknown usernames and wrong passwords fail identically so a login
/// attempt cannot probe for account existence.
///
/// # Errors
///
/// Returns [`Error::Unauthenticated`] on any credential mismatch.
pub fn verify_login(db: &Database, username: &str, password: &str) -> Result<Identity> {
    let record = Database::get_account(db.connection(), username)?;
    let Some(record) = record else {
        return Err(bad_credentials());
    };
    if !bcrypt::verify(password, &record.password_hash)? {
        return Err(bad_credentials());
    }
    Ok(Identity::new(record.username, record.role))
}

fn bad_credentials() -> Error {
    Error::Unauthenticated {
        reason: "unknown username or wrong password".into(),
    }
}

/// A profile as its owner sees it.
///
/// Admin accounts carry no profile row, so only the student and teacher
/// shapes exist here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProfileView {
    /// A student's own profile, reservation pointers included.
    Student(StudentProfile),
    /// A teacher's own profile.
    Teacher(TeacherProfile),
}

/// Contact fields an account owner may edit on their own profile.
///
/// Display name, major and class are fixed at account creation; only an
/// admin recreating the account changes them.
#[derive(Debug, Clone)]
pub enum ProfileUpdate {
    /// New contact fields for a student profile.
    Student {
        /// Contact email address.
        email: String,
        /// Contact phone number.
        phone: String,
    },
    /// New contact fields for a teacher profile.
    Teacher {
        /// Contact email address.
        email: String,
        /// Contact phone number.
        phone: String,
        /// Office location.
        office: String,
    },
}

impl ProfileUpdate {
    const fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Teacher { .. } => Role::Teacher,
        }
    }
}

/// Returns the caller's own profile.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no profile row exists for the caller,
/// which includes every admin account.
pub fn view_profile(db: &Database, caller: &Identity) -> Result<ProfileView> {
    let username = &caller.username;
    let profile = match caller.role {
        Role::Student => {
            Database::get_student_profile(db.connection(), username)?.map(ProfileView::Student)
        }
        Role::Teacher => {
            Database::get_teacher_profile(db.connection(), username)?.map(ProfileView::Teacher)
        }
        Role::Admin => None,
    };
    profile.ok_or_else(|| missing_profile(username))
}

/// Replaces the contact fields of the caller's own profile.
///
/// # Errors
///
/// Returns an error if:
/// - The update shape does not match the caller's role (`PermissionDenied`)
/// - The caller has no profile row (`NotFound`)
pub fn update_profile(db: &mut Database, caller: &Identity, update: &ProfileUpdate) -> Result<()> {
    caller.require_role(update.role())?;

    let tx = db
        .connection_mut()
        .transaction_with_behavior(TransactionBehavior::Immediate)?;
    let updated = match update {
        ProfileUpdate::Student { email, phone } => {
            Database::update_student_contact(&tx, &caller.username, email, phone)?
        }
        ProfileUpdate::Teacher {
            email,
            phone,
            office,
        } => Database::update_teacher_contact(&tx, &caller.username, email, phone, office)?,
    };
    if !updated {
        return Err(missing_profile(&caller.username));
    }
    tx.commit()?;
    Ok(())
}

/// Replaces the caller's own password.
///
/// The caller is already authenticated, so no second proof of the old
/// password is required.
///
/// # Errors
///
/// Returns an error if:
/// - The new password is empty (`Validation`)
/// - The caller's account no longer exists (`NotFound`)
pub fn change_password(db: &mut Database, caller: &Identity, new_password: &str) -> Result<()> {
    if new_password.is_empty() {
        return Err(Error::Validation {
            field: "password".into(),
            message: "password must be non-empty".into(),
        });
    }
    let password_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)?;

    let tx = db
        .connection_mut()
        .transaction_with_behavior(TransactionBehavior::Immediate)?;
    if !Database::update_account_password(&tx, &caller.username, &password_hash)? {
        return Err(Error::NotFound {
            resource: format!("account '{}'", caller.username),
        });
    }
    tx.commit()?;

    log::debug!("password changed for '{}'", caller.username);
    Ok(())
}

fn missing_profile(username: &str) -> Error {
    Error::NotFound {
        resource: format!("profile for '{username}'"),
    }
}
