//! The account directory: credentials, profiles and session tokens.
//!
//! The reservation engine treats identity as already resolved; this
//! module is the collaborator that does the resolving. It owns account
//! rows (bcrypt password hashes plus a role), the role-specific profile
//! rows, and the session tokens that turn a login into an [`Identity`]
//! on later requests.
//!
//! [`Identity`]: crate::identity::Identity

mod accounts;
mod tokens;

pub use accounts::{
    change_password, create_account, delete_account, reset_password, update_profile, verify_login,
    view_profile, AccountDetails, NewAccount, ProfileUpdate, ProfileView,
};
pub(crate) use accounts::AccountRecord;
pub use tokens::{TokenCodec, DEFAULT_TOKEN_TTL};
