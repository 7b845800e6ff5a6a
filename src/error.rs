use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StoreError;

/// AppError
///
/// The single error type returned by handlers and the authorization gate.
/// Every variant renders as `{"detail": "..."}`, the shape the dashboard frontend reads.
///
/// Authentication failures carry no detail: a missing header, a malformed
/// token, a bad signature and an expired token all produce the same 401 body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid token")]
    Unauthorized,

    /// Login failure. Identical for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin already exists")]
    Duplicate,

    /// Carries the human label of the resource, e.g. "Photo" or "Team member".
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Internal server error")]
    Store(#[from] StoreError),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Duplicate => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(e) => tracing::error!("store failure: {:?}", e),
            AppError::Internal(e) => tracing::error!("internal failure: {}", e),
            _ => {}
        }

        let status = self.status();
        let mut response = (status, Json(json!({ "detail": self.to_string() }))).into_response();

        if matches!(self, AppError::Unauthorized) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}
