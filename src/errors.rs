use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{AppointmentStatus, FieldErrors, LifecycleAction, SLOT_UNAVAILABLE_MESSAGE};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Infrastructure(#[from] anyhow::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("cannot {action} an appointment that is {from}")]
    InvalidTransition {
        from: AppointmentStatus,
        action: LifecycleAction,
    },

    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = match &self {
            AppError::Database(_) | AppError::Infrastructure(_) => {
                tracing::error!(error = %self, "request failed");
                serde_json::json!({ "error": "internal server error" })
            }
            AppError::Validation(fields) => serde_json::json!({
                "error": "validation failed",
                "fieldErrors": fields,
            }),
            AppError::Conflict(_) => serde_json::json!({ "error": SLOT_UNAVAILABLE_MESSAGE }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
