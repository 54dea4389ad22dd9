//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use portfolio_api::config::AppConfig;
use portfolio_api::context::{AppContext, StoreHandle};
use portfolio_api::http::HttpServer;
use portfolio_api::lifecycle::Shutdown;
use portfolio_api::storage::MemoryStore;

/// A memory store seeded with a few portfolio documents.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.insert("projects", json!({ "_id": "p1", "title": "Portfolio API" }));
    store.insert("projects", json!({ "_id": "p2", "title": "Dashboard" }));
    store.insert("projects", json!({ "_id": "p3", "title": "CLI" }));
    store.insert("skills", json!({ "_id": 7, "name": "Rust" }));
    Arc::new(store)
}

pub fn connected_context() -> AppContext {
    AppContext::with_store(AppConfig::default(), seeded_store())
}

pub fn degraded_context() -> AppContext {
    AppContext::new(
        AppConfig::default(),
        StoreHandle::unavailable("MONGODB_URI is not set"),
    )
}

pub fn app(context: AppContext) -> Router {
    HttpServer::new(context).into_router()
}

/// Send one request through `router` and return status and raw body.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

pub async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(router, request).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Start the full server on an ephemeral port.
pub async fn start_server(context: AppContext) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(context);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
