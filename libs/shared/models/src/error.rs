use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid field {field}: {message}")]
    InvalidField { field: String, message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidField { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!("Rejected request: {}: {}", status, self);

        let body = match self {
            AppError::InvalidField { field, message } => json!({
                "error": message,
                "field": field
            }),
            AppError::BadRequest(msg) => json!({
                "error": msg
            }),
        };

        (status, Json(body)).into_response()
    }
}
