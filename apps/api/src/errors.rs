use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interpretation::orchestrator::InterpretError;
use crate::journal::JournalError;
use crate::llm_client::ModelError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model upstream error: {0}")]
    ModelUpstream(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<InterpretError> for AppError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::Validation { field } => {
                AppError::Validation(format!("{field} cannot be empty"))
            }
            InterpretError::Interpretation(model_err) => match model_err {
                ModelError::Connection(_) => AppError::ModelUnavailable(model_err.to_string()),
                ModelError::Upstream { .. } => AppError::ModelUpstream(model_err.to_string()),
                ModelError::Client(_) => AppError::Internal(anyhow::Error::new(model_err)),
            },
            InterpretError::Cancelled => AppError::Cancelled,
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::NotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Model unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_UNAVAILABLE",
                    "The interpretation service is unavailable. Is the model server running?"
                        .to_string(),
                )
            }
            AppError::ModelUpstream(msg) => {
                tracing::error!("Model upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "MODEL_UPSTREAM_ERROR", msg.clone())
            }
            AppError::Cancelled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CANCELLED",
                "The request was cancelled".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: AppError = InterpretError::Validation { field: "dreamText" }.into();
        assert_eq!(err.to_string(), "Validation error: dreamText cannot be empty");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let err: AppError = InterpretError::Interpretation(ModelError::Upstream {
            status: 500,
            message: "boom".to_string(),
        })
        .into();
        assert!(matches!(err, AppError::ModelUpstream(ref m) if m.contains("500")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_cancelled_is_distinct_code() {
        let err: AppError = InterpretError::Cancelled.into();
        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_journal_not_found_maps_to_404() {
        let err: AppError = JournalError::NotFound("d1".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
