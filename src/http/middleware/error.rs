//! Catch-all error handler.
//!
//! Handler panics are caught by `CatchPanicLayer`, logged, and answered with
//! the fixed `500 Something broke!` response. Errors returned as `AppError`
//! take the same path through `AppError::into_response`.

use std::any::Any;

use axum::{body::Body, http::Response};

use crate::http::response::something_broke;

/// Panic handler for `CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "Unhandled error while handling request");
    something_broke()
}
