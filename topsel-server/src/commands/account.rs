//! Account administration commands.
//!
//! These run directly against the store, bypassing HTTP. They share the
//! library's role-gated account functions with the HTTP handlers and
//! exist for bootstrap and recovery, when no admin can log in.

use clap::{Parser, Subcommand, ValueEnum};
use topsel::directory::{create_account, delete_account, reset_password, AccountDetails, NewAccount};

use crate::commands::init::local_admin;
use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};

/// Account role accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    /// A student account (requires the student profile flags).
    Student,
    /// A teacher account (requires the teacher profile flags).
    Teacher,
    /// An administrator account (no profile flags).
    Admin,
}

/// Administer accounts directly against the store.
#[derive(Subcommand)]
pub enum AccountCommand {
    /// Create an account and its profile
    Create(CreateAccount),

    /// Delete an account
    Delete(DeleteAccount),

    /// Reset an account's password
    ResetPassword(ResetPassword),
}

impl AccountCommand {
    /// Execute the account subcommand.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self {
            Self::Create(cmd) => cmd.execute(global),
            Self::Delete(cmd) => cmd.execute(global),
            Self::ResetPassword(cmd) => cmd.execute(global),
        }
    }
}

/// Create an account.
#[derive(Parser)]
pub struct CreateAccount {
    /// Account username
    #[arg(long, value_name = "NAME")]
    username: String,

    /// Initial password
    #[arg(long, value_name = "PASSWORD")]
    password: String,

    /// Account role
    #[arg(long, value_enum)]
    role: RoleArg,

    /// Display name (students and teachers)
    #[arg(long, value_name = "NAME")]
    display_name: Option<String>,

    /// Major (students)
    #[arg(long, value_name = "MAJOR")]
    major: Option<String>,

    /// Class name (students)
    #[arg(long, value_name = "CLASS")]
    class_name: Option<String>,

    /// Contact email (students and teachers)
    #[arg(long, value_name = "EMAIL")]
    email: Option<String>,

    /// Contact phone (students and teachers)
    #[arg(long, value_name = "PHONE")]
    phone: Option<String>,

    /// Office location (teachers)
    #[arg(long, value_name = "OFFICE")]
    office: Option<String>,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, CliError> {
    value.ok_or_else(|| CliError::InvalidArguments(format!("--{field} is required for this role")))
}

impl CreateAccount {
    fn details(self) -> Result<(String, String, AccountDetails), CliError> {
        let details = match self.role {
            RoleArg::Student => AccountDetails::Student {
                display_name: required("display-name", self.display_name)?,
                major: required("major", self.major)?,
                class_name: required("class-name", self.class_name)?,
                email: required("email", self.email)?,
                phone: required("phone", self.phone)?,
            },
            RoleArg::Teacher => AccountDetails::Teacher {
                display_name: required("display-name", self.display_name)?,
                email: required("email", self.email)?,
                phone: required("phone", self.phone)?,
                office: required("office", self.office)?,
            },
            RoleArg::Admin => AccountDetails::Admin,
        };
        Ok((self.username, self.password, details))
    }

    /// Execute the create command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (username, password, details) = self.details()?;
        let account = NewAccount::new(username, password, details)?;
        let name = account.username().to_string();
        let role = account.role();

        let mut db = open_database(global)?;
        create_account(&mut db, &local_admin(), &account)?;
        println!("Created {role} account '{name}'");
        Ok(())
    }
}

/// Delete an account.
#[derive(Parser)]
pub struct DeleteAccount {
    /// Account username
    #[arg(long, value_name = "NAME")]
    username: String,
}

impl DeleteAccount {
    /// Execute the delete command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut db = open_database(global)?;
        delete_account(&mut db, &local_admin(), &self.username)?;
        println!("Deleted account '{}'", self.username);
        Ok(())
    }
}

/// Reset an account's password.
#[derive(Parser)]
pub struct ResetPassword {
    /// Account username
    #[arg(long, value_name = "NAME")]
    username: String,

    /// The new password
    #[arg(long, value_name = "PASSWORD")]
    password: String,
}

impl ResetPassword {
    /// Execute the reset-password command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut db = open_database(global)?;
        reset_password(&mut db, &local_admin(), &self.username, &self.password)?;
        println!("Reset password for '{}'", self.username);
        Ok(())
    }
}
