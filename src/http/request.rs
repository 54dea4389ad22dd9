//! Request identification.
//!
//! Every request gets an `x-request-id` (UUID v4) as early as possible in the
//! middleware stack unless the caller already sent one. The same id is
//! recorded on the request span and echoed on the response.

use axum::http::{HeaderMap, HeaderName};

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// `X_REQUEST_ID` as a typed header name.
pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Read the request id from a header map.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}
