//! Health check endpoint.
//!
//! Used by load balancers to verify the process is serving. It does not
//! touch the database.

use axum::http::StatusCode;

/// `GET /healthz`
#[allow(clippy::unused_async)]
pub async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
