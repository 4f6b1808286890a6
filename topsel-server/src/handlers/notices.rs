//! Notice board endpoints.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use topsel::notice::{delete_notice, list_notices, post_notice};
use topsel::{Notice, NoticeDraft};

use crate::api::ApiError;
use crate::extract::Caller;
use crate::handlers::with_db;
use crate::state::AppState;

/// `GET /api/v1/notices`
pub async fn list(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<Notice>>, ApiError> {
    let notices = with_db(&state, |db| list_notices(db.connection())).await?;
    Ok(Json(notices))
}

/// Request body for `POST /api/v1/notices/publish`.
#[derive(Debug, Deserialize)]
pub struct PostNoticeRequest {
    /// Notice title.
    pub title: String,
    /// Notice body.
    pub body: String,
}

/// `POST /api/v1/notices/publish`
pub async fn publish(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<PostNoticeRequest>,
) -> Result<Json<Notice>, ApiError> {
    let notice = with_db(&state, move |db| {
        let draft = NoticeDraft::new(request.title, request.body)?;
        post_notice(db, &caller, &draft)
    })
    .await?;
    Ok(Json(notice))
}

/// Request body for `POST /api/v1/notices/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteNoticeRequest {
    /// Id of the notice to delete.
    pub id: i64,
}

/// `POST /api/v1/notices/delete`
pub async fn delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<DeleteNoticeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    with_db(&state, move |db| delete_notice(db, &caller, request.id)).await?;
    Ok(Json(serde_json::json!({ "deleted": request.id })))
}
