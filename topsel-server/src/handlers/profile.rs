//! Self-service profile endpoints.
//!
//! Signed-in students and teachers view and edit their own contact
//! fields and rotate their own password. Admin accounts carry no
//! profile row, so the view and update routes answer 404 for them.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use topsel::directory::{update_profile, view_profile, ProfileUpdate, ProfileView};
use topsel::{Error, Role};

use crate::api::ApiError;
use crate::extract::Caller;
use crate::handlers::with_db;
use crate::state::AppState;

/// `GET /api/v1/profile`
pub async fn view(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = with_db(&state, move |db| view_profile(db, &caller)).await?;
    Ok(Json(profile))
}

/// Request body for `POST /api/v1/profile/update`.
///
/// `office` is required for teachers and ignored for students.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Office location (teachers).
    pub office: Option<String>,
}

/// `POST /api/v1/profile/update`
pub async fn update(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = with_db(&state, move |db| {
        let update = match caller.role {
            Role::Student => ProfileUpdate::Student {
                email: request.email,
                phone: request.phone,
            },
            Role::Teacher => ProfileUpdate::Teacher {
                email: request.email,
                phone: request.phone,
                office: request.office.ok_or_else(|| Error::Validation {
                    field: "office".to_string(),
                    message: "office is required for this role".to_string(),
                })?,
            },
            Role::Admin => {
                return Err(Error::NotFound {
                    resource: format!("profile for '{}'", caller.username),
                })
            }
        };
        update_profile(db, &caller, &update)?;
        Ok(caller.username)
    })
    .await?;
    Ok(Json(serde_json::json!({ "updated": username })))
}

/// Request body for `POST /api/v1/profile/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// The new password.
    pub password: String,
}

/// `POST /api/v1/profile/change-password`
pub async fn change_password(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = with_db(&state, move |db| {
        topsel::directory::change_password(db, &caller, &request.password)?;
        Ok(caller.username)
    })
    .await?;
    tracing::info!(%username, "password changed");
    Ok(Json(serde_json::json!({ "changed": username })))
}
