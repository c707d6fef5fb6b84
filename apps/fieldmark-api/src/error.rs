//! Error types for the Fieldmark API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fieldmark_core::FieldError;
use fieldmark_export::ExportError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Preview rendering failed: {0}")]
    Render(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Field(FieldError::DocumentNotFound(_))
            | ApiError::Field(FieldError::FieldNotFound(_)) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Field(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Export(e) => {
                tracing::error!("Export failed: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ApiError::Render(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
