//! Local emulation of the serverless platform.
//!
//! Requests arriving on the dev listener are resolved through the routing
//! descriptor. Those landing on this function's build are forwarded, path and
//! all, through the [`Adapter`]; everything else is a platform 404.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::adapter::Adapter;
use crate::routing::DescriptorRouter;

/// Body of the platform's own 404.
pub const PLATFORM_NOT_FOUND: &str = "NOT_FOUND";

#[derive(Clone)]
struct DevState {
    routes: Arc<DescriptorRouter>,
    adapter: Adapter,
    entry: Arc<str>,
}

pub struct DevHost {
    state: DevState,
}

impl DevHost {
    /// `entry` is the `builds[].src` naming the function `adapter` serves.
    pub fn new(routes: DescriptorRouter, adapter: Adapter, entry: impl Into<String>) -> Self {
        let entry: String = entry.into();
        Self {
            state: DevState {
                routes: Arc::new(routes),
                adapter,
                entry: Arc::from(entry.trim_start_matches('/')),
            },
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(entry = %self.state.entry, "Dev host emulating platform routing");
        crate::http::server::serve(self.router(), listener, shutdown).await
    }
}

async fn dispatch(State(state): State<DevState>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match state.routes.resolve(&method, &path) {
        Some(resolved)
            if resolved.build.as_deref().map(|b| b.trim_start_matches('/'))
                == Some(&*state.entry) =>
        {
            tracing::debug!(route = resolved.route, path = %path, "Forwarding to function");
            state.adapter.call(request).await
        }
        Some(resolved) => {
            tracing::warn!(
                route = resolved.route,
                dest = %resolved.dest,
                "Route resolves outside this function"
            );
            (StatusCode::NOT_FOUND, PLATFORM_NOT_FOUND).into_response()
        }
        None => {
            tracing::debug!(method = %method, path = %path, "No descriptor route matched");
            (StatusCode::NOT_FOUND, PLATFORM_NOT_FOUND).into_response()
        }
    }
}
