use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::users::store::StoreError;

/// One violated rule reported by the validation layer.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Application-level errors. Every variant maps to a status code and a
/// structured JSON body; nothing leaves a handler without a response.
#[derive(Error, Debug)]
pub enum AppError {
    /// All violated rules for a request, collected before any storage call.
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("user {0} already exists")]
    Duplicate(i64),

    #[error("no user with id {0}")]
    NotFound(i64),

    /// The delete surface has always reported a missing record as a bad
    /// request rather than a 404; kept as-is.
    #[error("no user with id {0}")]
    MissingDeleteTarget(i64),

    #[error("email already registered")]
    EmailTaken,

    /// Same message for an unknown email and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Storage(StoreError),

    #[error("intentional error")]
    Intentional,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(id) => AppError::Duplicate(id),
            StoreError::NotFound(id) => AppError::NotFound(id),
            other => AppError::Storage(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_)
            | AppError::Duplicate(_)
            | AppError::MissingDeleteTarget(_)
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::Storage(_) | AppError::Intentional | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match self {
            AppError::Validation(violations) => json!({ "errors": violations }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_public_surface() {
        assert_eq!(
            AppError::Duplicate(1).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MissingDeleteTarget(1).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidToken.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Intentional.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_maps_to_a_bad_request() {
        let err = AppError::Validation(vec![
            FieldViolation {
                field: "id",
                message: "id is required".into(),
            },
            FieldViolation {
                field: "name",
                message: "name must be at least 3 characters".into(),
            },
        ]);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
