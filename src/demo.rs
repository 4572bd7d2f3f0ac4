use axum::{routing::get, Router};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/error", get(intentional_error))
}

/// Plain greeting, handy as a liveness probe.
async fn welcome() -> &'static str {
    "Welcome to the user service"
}

/// Always fails; exercises the centralized error response path.
async fn intentional_error() -> AppResult<()> {
    Err(AppError::Intentional)
}
