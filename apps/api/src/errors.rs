use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::encoding::EncodingError;
use crate::extraction::quiz::QuizError;
use crate::extraction::AnalysisError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("No prediction engine has been trained")]
    ModelNotTrained,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<Value>) {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Analysis(AnalysisError::SourceUnavailable(e)) => {
                tracing::warn!("Source unavailable: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SOURCE_UNAVAILABLE",
                    self.to_string(),
                    None,
                )
            }
            AppError::Analysis(AnalysisError::EmptySource(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_SOURCE",
                msg.clone(),
                None,
            ),
            AppError::Analysis(AnalysisError::InvalidIdentifier(_)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
                None,
            ),
            AppError::Quiz(QuizError::MalformedAnswer(_)) => (
                StatusCode::BAD_REQUEST,
                "MALFORMED_ANSWER",
                self.to_string(),
                None,
            ),
            AppError::Quiz(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string(), None),
            AppError::Encoding(EncodingError::UnknownCategory { field, value }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNKNOWN_CATEGORY",
                self.to_string(),
                Some(json!({ "field": field.column(), "value": value })),
            ),
            AppError::Encoding(e) => {
                tracing::error!("Encoding error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ENCODING_ERROR",
                    "The fitted encoders rejected the request".to_string(),
                    None,
                )
            }
            AppError::ModelNotTrained => (
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_NOT_TRAINED",
                "No prediction engine is loaded; set TRAINING_DATA_PATH and restart".to_string(),
                None,
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
