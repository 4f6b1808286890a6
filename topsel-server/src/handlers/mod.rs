//! HTTP handlers, one module per resource.

pub mod accounts;
pub mod health;
pub mod notices;
pub mod profile;
pub mod reservations;
pub mod session;
pub mod topics;

use deadpool::managed::PoolError;
use serde::Serialize;
use topsel::operations::ExecutionResult;
use topsel::{Database, Topic};

use crate::api::ApiError;
use crate::state::AppState;

/// Checks out a pooled connection and runs the closure on the blocking
/// thread pool. Engine calls are synchronous SQLite work and must not
/// run on the async executor.
pub(crate) async fn with_db<T, F>(state: &AppState, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Database) -> topsel::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let mut conn = state.pool.get().await.map_err(pool_error)?;
    tokio::task::spawn_blocking(move || work(&mut conn))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::from)
}

fn pool_error(err: PoolError<topsel::Error>) -> ApiError {
    match err {
        PoolError::Backend(e) => ApiError::from(e),
        PoolError::Timeout(_) => ApiError::from(topsel::Error::Unavailable {
            details: "connection pool exhausted".to_string(),
        }),
        other => ApiError::internal(other),
    }
}

/// JSON body returned by every mutating topic operation.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    /// Whether the operation took effect.
    pub success: bool,
    /// Human-readable descriptions of the applied actions.
    pub actions: Vec<String>,
    /// Warnings raised during planning.
    pub warnings: Vec<String>,
    /// The created topic, for publish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
}

impl From<ExecutionResult> for OperationResponse {
    fn from(result: ExecutionResult) -> Self {
        Self {
            success: result.success,
            actions: result.actions_taken,
            warnings: result.warnings,
            topic: result.topic,
        }
    }
}
