//! Error-to-response mapping.
//!
//! # Design Decisions
//! - Client errors answer JSON `{ "error": ... }`
//! - Missing storage answers 503 so callers can tell it from a bug
//! - Every other failure is logged and answered with the fixed
//!   `500 Something broke!` plain-text body

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::storage::StoreError;

/// Body of the catch-all 500 response.
pub const SOMETHING_BROKE: &str = "Something broke!";

/// The fixed catch-all response.
pub fn something_broke() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, SOMETHING_BROKE).into_response()
}

/// Unified error type for handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    MultipartForm(#[from] MultipartRejection),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Express-style "Cannot GET /path" not-found error.
    pub fn no_route(method: &Method, uri: &Uri) -> Self {
        Self::NotFound(format!("Cannot {} {}", method, uri.path()))
    }
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => json_error(StatusCode::NOT_FOUND, message),
            AppError::BadRequest(message) => json_error(StatusCode::BAD_REQUEST, message),
            AppError::Query(e) => json_error(e.status(), e.body_text()),
            AppError::MultipartForm(e) => json_error(e.status(), e.body_text()),
            AppError::Multipart(e) => json_error(e.status(), e.body_text()),
            AppError::Store(StoreError::Unavailable(reason)) => {
                tracing::warn!(reason = %reason, "Request needs storage but none is connected");
                json_error(StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                something_broke()
            }
        }
    }
}

/// Fallback for paths no route claims.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::no_route(&method, &uri)
}
