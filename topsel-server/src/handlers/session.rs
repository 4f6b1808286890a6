//! Login: credentials in, bearer token out.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use topsel::directory::verify_login;

use crate::api::ApiError;
use crate::handlers::with_db;
use crate::state::AppState;

/// Request body for `POST /api/v1/session/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Account password, verified against the stored bcrypt hash.
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token for subsequent requests.
    pub token: String,
    /// The authenticated username.
    pub username: String,
    /// The account role, lowercase.
    pub role: String,
}

/// `POST /api/v1/session/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let identity = with_db(&state, move |db| {
        verify_login(db, &request.username, &request.password)
    })
    .await?;

    let token = state.tokens.issue(&identity)?;
    tracing::info!(username = %identity.username, role = %identity.role, "login");
    Ok(Json(LoginResponse {
        token,
        username: identity.username,
        role: identity.role.to_string(),
    }))
}
