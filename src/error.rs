use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed identifier or payload. Carries the underlying message.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    /// The round-trip succeeded but produced an unexpected shape.
    #[error("{0}")]
    Internal(&'static str),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("time error: {0}")]
    Time(#[from] jiff::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_string())
            }
            AppError::Bson(err) => {
                tracing::error!(error = %err, "bson serialization failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "serialization error".to_string())
            }
            AppError::Time(err) => {
                tracing::error!(error = %err, "timestamp failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "time error".to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
