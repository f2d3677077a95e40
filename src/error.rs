/*
 * Responsibility
 * - App-wide AppError definition with one variant per failure category
 * - IntoResponse mapping to the fixed response contract (status + plain body)
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Request-path outcomes other than success.
///
/// Note:
/// - Bodies are part of the public contract and therefore fixed strings,
///   not a JSON envelope.
/// - Authentication and authorization failures are deliberately
///   indistinguishable to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("not authorized")]
    Unauthorized,
    #[error("cache error")]
    Cache,
    #[error("negative balance error")]
    NegativeBalance,
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "not authorized"),
            AppError::Cache => (StatusCode::INTERNAL_SERVER_ERROR, "cache error"),
            AppError::NegativeBalance => {
                (StatusCode::INTERNAL_SERVER_ERROR, "negative balance error")
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        };

        (status, body).into_response()
    }
}
