//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, CORS, limits,
//!   timeouts, catch-all error handling)
//! - Bind server to listener with graceful shutdown

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePath,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HttpConfig;
use crate::context::AppContext;
use crate::http::middleware::error::handle_panic;
use crate::http::request::request_id_header;
use crate::http::response;
use crate::http::routes::{health, resources, uploads, welcome, API_PREFIX};
use crate::observability::metrics::track_metrics;
use crate::observability::tracing::make_request_span;

/// HTTP server for the portfolio API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over an already built context.
    pub fn new(context: AppContext) -> Self {
        let http = context.config.http.clone();
        let router = apply_middleware(trim_trailing_slash(routes(context)), &http);
        Self { router }
    }

    /// A handle to the fully layered application.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        serve(self.router, listener, shutdown).await
    }
}

/// Serve `app` on `listener` with graceful shutdown.
pub async fn serve(
    app: Router,
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// The route table, without middleware.
pub fn routes(context: AppContext) -> Router {
    let upload_limit = context.config.http.upload_limit_bytes;

    Router::new()
        .route("/", get(welcome::welcome))
        .route("/health", get(health::health))
        .route(
            &format!("{}/uploads", API_PREFIX),
            post(uploads::upload_files).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            &format!("{}/{{collection}}", API_PREFIX),
            get(resources::list_documents),
        )
        .route(
            &format!("{}/{{collection}}/{{id}}", API_PREFIX),
            get(resources::get_document),
        )
        .fallback(response::not_found)
        .method_not_allowed_fallback(response::not_found)
        .with_state(context)
}

/// Serve `/path/` exactly like `/path`.
///
/// Normalization has to run before route matching, so the routes are
/// nested as the fallback service of an outer router.
pub fn trim_trailing_slash(router: Router) -> Router {
    Router::new().fallback_service(NormalizePath::trim_trailing_slash(router))
}

/// Wrap a router in the full middleware stack.
///
/// Outermost first: request id → trace span → id propagation → metrics →
/// CORS → body limit → timeout → catch-all error handler → handler.
#[allow(deprecated)]
pub fn apply_middleware(router: Router, config: &HttpConfig) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(cors_layer(&config.cors_allow_origins))
        .layer(middleware::from_fn(track_metrics))
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::MemoryStore;
    use axum::{body::Body, http::Request, http::StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        HttpServer::new(AppContext::with_store(
            AppConfig::default(),
            Arc::new(MemoryStore::new()),
        ))
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_caller_request_id_is_kept() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "caller-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "caller-id");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "https://ij.dev")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_cors_allow_list() {
        let mut config = AppConfig::default();
        config.http.cors_allow_origins = vec!["https://ij.dev".to_string()];
        let router = HttpServer::new(AppContext::with_store(config, Arc::new(MemoryStore::new())))
            .into_router();

        let allowed = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "https://ij.dev")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "https://ij.dev"
        );

        let other = router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "https://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::OK);
        assert!(!other.headers().contains_key("access-control-allow-origin"));
    }
}
