use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Error surface of the scoring subsystem.
///
/// `Fetch` and `Compute` are constructed explicitly at the call sites that
/// read store data or write computed scores, so callers can tell a failed
/// read apart from a score write that died after a successful computation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("store read failed: {0}")]
    Fetch(#[source] sqlx::Error),

    #[error("score write failed: {0}")]
    Compute(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch(_) | AppError::Compute(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
