//! Topic operations: listing plus the six mutations.
//!
//! Each mutation builds a plan from the caller's identity and executes
//! it on a pooled connection; role and ownership checks live in the
//! library, this layer only shapes requests and responses.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use topsel::operations::{
    list_topics, search_topics, view_as_teacher, ConfirmOptions, ConfirmPlan, DeleteOptions,
    DeletePlan, PlanExecutor, PublishOptions, PublishPlan, RejectOptions, RejectPlan,
    ReserveOptions, ReservePlan, WithdrawPlan,
};
use topsel::{OwnedTopicStatus, TopicSummary};

use crate::api::ApiError;
use crate::extract::Caller;
use crate::handlers::{with_db, OperationResponse};
use crate::state::AppState;

/// `GET /api/v1/topics`
pub async fn list(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<TopicSummary>>, ApiError> {
    let summaries = with_db(&state, |db| list_topics(db.connection())).await?;
    Ok(Json(summaries))
}

/// Query parameters for topic search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring matched against the owning teacher's display name.
    pub teacher: String,
}

/// `GET /api/v1/topics/search?teacher=`
pub async fn search(
    State(state): State<AppState>,
    _caller: Caller,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<TopicSummary>>, ApiError> {
    let summaries =
        with_db(&state, move |db| search_topics(db.connection(), &params.teacher)).await?;
    Ok(Json(summaries))
}

/// `GET /api/v1/topics/mine`
pub async fn mine(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<Vec<OwnedTopicStatus>>, ApiError> {
    let rows = with_db(&state, move |db| view_as_teacher(db.connection(), &caller)).await?;
    Ok(Json(rows))
}

/// Request body for `POST /api/v1/topics/publish`.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    /// Topic title, unique across live topics.
    pub title: String,
    /// Major the topic is intended for.
    pub required_major: String,
    /// Topic description.
    pub content: String,
}

/// `POST /api/v1/topics/publish`
pub async fn publish(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<PublishRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    let result = with_db(&state, move |db| {
        let plan = PublishPlan::new(
            caller,
            PublishOptions::new(request.title, request.required_major, request.content),
        )
        .build_plan(db.connection())?;
        PlanExecutor::new(db).execute(&plan)
    })
    .await?;
    Ok(Json(result.into()))
}

/// Request body naming a topic by title.
#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    /// The topic title.
    pub title: String,
}

/// `POST /api/v1/topics/reserve`
pub async fn reserve(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<TitleRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    let result = with_db(&state, move |db| {
        let plan = ReservePlan::new(caller, ReserveOptions::new(request.title))
            .build_plan(db.connection())?;
        PlanExecutor::new(db).execute(&plan)
    })
    .await?;
    Ok(Json(result.into()))
}

/// `POST /api/v1/topics/withdraw`
pub async fn withdraw(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<OperationResponse>, ApiError> {
    let result = with_db(&state, move |db| {
        let plan = WithdrawPlan::new(caller).build_plan(db.connection())?;
        PlanExecutor::new(db).execute(&plan)
    })
    .await?;
    Ok(Json(result.into()))
}

/// Request body for `POST /api/v1/topics/confirm`.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    /// The topic title.
    pub title: String,
    /// Display name of the student being confirmed. Must match the
    /// current holder.
    pub student_name: String,
}

/// `POST /api/v1/topics/confirm`
pub async fn confirm(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    let result = with_db(&state, move |db| {
        let plan = ConfirmPlan::new(
            caller,
            ConfirmOptions::new(request.title, request.student_name),
        )
        .build_plan(db.connection())?;
        PlanExecutor::new(db).execute(&plan)
    })
    .await?;
    Ok(Json(result.into()))
}

/// `POST /api/v1/topics/reject`
pub async fn reject(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<TitleRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    let result = with_db(&state, move |db| {
        let plan = RejectPlan::new(caller, RejectOptions::new(request.title))
            .build_plan(db.connection())?;
        PlanExecutor::new(db).execute(&plan)
    })
    .await?;
    Ok(Json(result.into()))
}

/// `POST /api/v1/topics/delete`
pub async fn delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<TitleRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    let result = with_db(&state, move |db| {
        let plan = DeletePlan::new(caller, DeleteOptions::new(request.title))
            .build_plan(db.connection())?;
        PlanExecutor::new(db).execute(&plan)
    })
    .await?;
    Ok(Json(result.into()))
}
