//! Init command implementation.
//!
//! Creates (or opens) the database, runs an integrity check, and can
//! create the first admin account so the HTTP account endpoints have a
//! caller to start from.

use clap::Parser;
use topsel::directory::{create_account, AccountDetails, NewAccount};
use topsel::{Identity, Role};

use crate::error::CliError;
use crate::utils::{open_database, resolve_db_path, GlobalOptions};

/// Initialize the topsel database.
#[derive(Parser)]
#[command(about = "Create the database and optionally the first admin account")]
pub struct InitCommand {
    /// Username for the first admin account
    #[arg(long, value_name = "NAME", requires = "admin_password")]
    admin_username: Option<String>,

    /// Password for the first admin account
    #[arg(long, value_name = "PASSWORD", requires = "admin_username")]
    admin_password: Option<String>,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = resolve_db_path(global)?;
        let mut db = open_database(global)?;
        db.verify_integrity()?;
        println!("Database ready at {}", path.display());

        if let (Some(username), Some(password)) = (self.admin_username, self.admin_password) {
            let account =
                NewAccount::new(username.clone(), password, AccountDetails::Admin)?;
            create_account(&mut db, &local_admin(), &account)?;
            println!("Created admin account '{username}'");
        }
        Ok(())
    }
}

/// The implicit caller for local administration. Anyone with filesystem
/// access to the store already has full control; the CLI does not
/// re-authenticate.
pub(crate) fn local_admin() -> Identity {
    Identity::new("local-admin", Role::Admin)
}
