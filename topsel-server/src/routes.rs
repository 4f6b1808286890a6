//! Router assembly: one static route per operation.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, health, notices, profile, reservations, session, topics};
use crate::state::AppState;

/// Builds the full application router over the given state.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/api/v1/session/login", post(session::login))
        .route("/api/v1/topics", get(topics::list))
        .route("/api/v1/topics/search", get(topics::search))
        .route("/api/v1/topics/mine", get(topics::mine))
        .route("/api/v1/topics/publish", post(topics::publish))
        .route("/api/v1/topics/reserve", post(topics::reserve))
        .route("/api/v1/topics/withdraw", post(topics::withdraw))
        .route("/api/v1/topics/confirm", post(topics::confirm))
        .route("/api/v1/topics/reject", post(topics::reject))
        .route("/api/v1/topics/delete", post(topics::delete))
        .route("/api/v1/reservations/mine", get(reservations::mine))
        .route("/api/v1/profile", get(profile::view))
        .route("/api/v1/profile/update", post(profile::update))
        .route("/api/v1/profile/change-password", post(profile::change_password))
        .route("/api/v1/notices", get(notices::list))
        .route("/api/v1/notices/publish", post(notices::publish))
        .route("/api/v1/notices/delete", post(notices::delete))
        .route("/api/v1/accounts/create", post(accounts::create))
        .route("/api/v1/accounts/delete", post(accounts::delete))
        .route("/api/v1/accounts/reset-password", post(accounts::reset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
