//! Bearer-token authentication extractor.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use topsel::Identity;

use crate::api::ApiError;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization` header.
///
/// Handlers that take a `Caller` reject requests without a valid
/// `Bearer` token before any database work happens. Role checks stay in
/// the library; this extractor only authenticates.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Authorization header is not a bearer token"))?;
        let identity = state.directory.resolve(token)?;
        Ok(Self(identity))
    }
}
