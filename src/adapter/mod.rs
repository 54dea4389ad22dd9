//! Request adapter between a serverless host and the application.
//!
//! # Data Flow
//! ```text
//! host event (HostRequest)
//!     → host.rs (into http::Request)
//!     → Adapter::call (Router dispatch, unchanged)
//!     → host.rs (buffer http::Response into HostResponse)
//!     → host
//! ```
//!
//! # Design Decisions
//! - The adapter adds no semantics: whatever the application answers is
//!   what the host receives
//! - The adapter is total: malformed host input and unreadable bodies become
//!   the fixed 500 response instead of an error

pub mod host;

use std::convert::Infallible;

use axum::{body::Body, http::Request, response::Response, Router};
use tower::ServiceExt;

pub use host::{HostError, HostRequest, HostResponse};

use crate::context::AppContext;
use crate::http::HttpServer;

/// Forwards host requests into the application's dispatch entry point.
#[derive(Clone)]
pub struct Adapter {
    router: Router,
}

impl Adapter {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Build the full application over `context` and wrap it.
    pub fn from_context(context: AppContext) -> Self {
        Self::new(HttpServer::new(context).into_router())
    }

    /// Dispatch an `http::Request` into the application.
    pub async fn call(&self, request: Request<Body>) -> Response {
        let result: Result<Response, Infallible> = self.router.clone().oneshot(request).await;
        match result {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    /// Dispatch a host event and produce the host's response.
    pub async fn dispatch(&self, event: HostRequest) -> HostResponse {
        let request = match event.into_request() {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(error = %e, "Malformed host request");
                return HostResponse::something_broke();
            }
        };

        let response = self.call(request).await;

        match HostResponse::from_response(response).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Failed to buffer application response");
                HostResponse::something_broke()
            }
        }
    }
}
