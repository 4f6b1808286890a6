//! Admin account lifecycle endpoints.
//!
//! Role gating happens in the library; these handlers only shape the
//! JSON. Passwords never appear in responses or logs.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use topsel::directory::{create_account, delete_account, reset_password, AccountDetails, NewAccount};
use topsel::{Error, Role};

use crate::api::ApiError;
use crate::extract::Caller;
use crate::handlers::with_db;
use crate::state::AppState;

/// Request body for `POST /api/v1/accounts/create`.
///
/// `role` selects which profile fields are required: students need
/// `display_name`, `major`, `class_name`, `email`, `phone`; teachers
/// need `display_name`, `email`, `phone`, `office`; admins need none.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account username.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Account role, lowercase.
    pub role: String,
    /// Display name (students and teachers).
    pub display_name: Option<String>,
    /// Major (students).
    pub major: Option<String>,
    /// Class name (students).
    pub class_name: Option<String>,
    /// Contact email (students and teachers).
    pub email: Option<String>,
    /// Contact phone (students and teachers).
    pub phone: Option<String>,
    /// Office location (teachers).
    pub office: Option<String>,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, Error> {
    value.ok_or_else(|| Error::Validation {
        field: field.to_string(),
        message: format!("{field} is required for this role"),
    })
}

fn details_from_request(request: CreateAccountRequest) -> Result<NewAccount, Error> {
    let role: Role = request.role.parse().map_err(|_| Error::Validation {
        field: "role".to_string(),
        message: format!("unknown role '{}'", request.role),
    })?;
    let details = match role {
        Role::Student => AccountDetails::Student {
            display_name: required("display_name", request.display_name)?,
            major: required("major", request.major)?,
            class_name: required("class_name", request.class_name)?,
            email: required("email", request.email)?,
            phone: required("phone", request.phone)?,
        },
        Role::Teacher => AccountDetails::Teacher {
            display_name: required("display_name", request.display_name)?,
            email: required("email", request.email)?,
            phone: required("phone", request.phone)?,
            office: required("office", request.office)?,
        },
        Role::Admin => AccountDetails::Admin,
    };
    NewAccount::new(request.username, request.password, details)
}

/// `POST /api/v1/accounts/create`
pub async fn create(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (username, role) = with_db(&state, move |db| {
        let account = details_from_request(request)?;
        let username = account.username().to_string();
        let role = account.role();
        create_account(db, &caller, &account)?;
        Ok((username, role))
    })
    .await?;
    tracing::info!(%username, %role, "account created");
    Ok(Json(
        serde_json::json!({ "username": username, "role": role.as_str() }),
    ))
}

/// Request body naming an account.
#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    /// The account username.
    pub username: String,
}

/// `POST /api/v1/accounts/delete`
pub async fn delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<UsernameRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = with_db(&state, move |db| {
        delete_account(db, &caller, &request.username)?;
        Ok(request.username)
    })
    .await?;
    tracing::info!(%username, "account deleted");
    Ok(Json(serde_json::json!({ "deleted": username })))
}

/// Request body for `POST /api/v1/accounts/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// The account username.
    pub username: String,
    /// The new password.
    pub password: String,
}

/// `POST /api/v1/accounts/reset-password`
pub async fn reset(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = with_db(&state, move |db| {
        reset_password(db, &caller, &request.username, &request.password)?;
        Ok(request.username)
    })
    .await?;
    Ok(Json(serde_json::json!({ "reset": username })))
}
