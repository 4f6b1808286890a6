//! The student's own reservation.

use axum::extract::State;
use axum::Json;
use topsel::operations::view_as_student;
use topsel::TopicSummary;

use crate::api::ApiError;
use crate::extract::Caller;
use crate::handlers::with_db;
use crate::state::AppState;

/// `GET /api/v1/reservations/mine`
///
/// Returns the topic the caller holds, current or confirmed, joined
/// with the owning teacher's contact profile. 404 when the caller holds
/// nothing.
pub async fn mine(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<TopicSummary>, ApiError> {
    let summary = with_db(&state, move |db| view_as_student(db.connection(), &caller)).await?;
    Ok(Json(summary))
}
