//! End-to-end behaviour of the HTTP application, driven in-process.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};

use portfolio_api::config::{AppConfig, FailurePolicy, HttpConfig};
use portfolio_api::http::routes::COLLECTIONS;
use portfolio_api::http::server::apply_middleware;
use portfolio_api::http::SOMETHING_BROKE;
use portfolio_api::lifecycle::startup::build_context_with;

mod common;

#[tokio::test]
async fn test_welcome_lists_every_collection() {
    let (status, body) = common::get(common::app(common::connected_context()), "/").await;

    assert_eq!(status, StatusCode::OK);
    let endpoints = body["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), COLLECTIONS.len());
    assert_eq!(endpoints[0], "GET /api/v1/profile");
    assert!(body["message"].as_str().unwrap().contains("IJ"));
}

#[tokio::test]
async fn test_handler_panic_becomes_fixed_500() {
    async fn boom() -> &'static str {
        panic!("handler exploded")
    }

    let router = apply_middleware(Router::new().route("/boom", get(boom)), &HttpConfig::default());
    let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
    let (status, body) = common::send(router, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, SOMETHING_BROKE.as_bytes());
}

#[tokio::test]
async fn test_list_and_pagination() {
    let app = common::app(common::connected_context());

    let (status, body) = common::get(app.clone(), "/api/v1/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = common::get(app.clone(), "/api/v1/projects?skip=1&limit=1").await;
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["_id"], "p2");

    // Known collection with no documents.
    let (status, body) = common::get(app, "/api/v1/blogs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_get_by_id() {
    let app = common::app(common::connected_context());

    let (status, body) = common::get(app.clone(), "/api/v1/projects/p3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "CLI");

    let (status, body) = common::get(app.clone(), "/api/v1/skills/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Rust");

    let (status, body) = common::get(app, "/api/v1/projects/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_routes_are_json_404() {
    let app = common::app(common::connected_context());

    let (status, body) = common::get(app.clone(), "/api/v1/secrets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Cannot GET /api/v1/secrets");

    // Known path, unsupported method.
    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/projects/p1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = common::send(app.clone(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::builder()
        .method("DELETE")
        .uri("/nowhere/at/all")
        .body(Body::empty())
        .unwrap();
    let (status, body) = common::send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Cannot DELETE /nowhere/at/all");
}

#[tokio::test]
async fn test_degraded_storage() {
    let app = common::app(common::degraded_context());

    let (status, _) = common::get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");

    let (status, body) = common::get(app, "/api/v1/projects").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "database unavailable");
}

#[tokio::test]
async fn test_startup_policy() {
    let degraded = build_context_with(AppConfig::default(), |_| None).await.unwrap();
    assert!(!degraded.store.is_connected());

    let mut config = AppConfig::default();
    config.database.on_failure = FailurePolicy::FailFast;
    assert!(build_context_with(config, |_| None).await.is_err());

    let connected = build_context_with(AppConfig::default(), |key| {
        (key == "MONGODB_URI").then(|| "memory://".to_string())
    })
    .await
    .unwrap();
    let (_, body) = common::get(common::app(connected), "/health").await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["kind"], "memory");
}

#[tokio::test]
async fn test_upload_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.http.upload_dir = dir.path().to_path_buf();
    let app = common::app(portfolio_api::AppContext::with_store(
        config,
        common::seeded_store(),
    ));

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nhello\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"../cv.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n%PDF-1.4\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/uploads")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = common::send(app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["file_name"], "cv.pdf");
    assert_eq!(files[0]["size"], 8);

    let stored = dir.path().join(files[0]["stored_as"].as_str().unwrap());
    assert_eq!(std::fs::read(stored).unwrap(), b"%PDF-1.4");
}

#[tokio::test]
async fn test_upload_without_files_is_rejected() {
    let app = common::app(common::connected_context());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/uploads")
        .header("content-type", "multipart/form-data; boundary=B")
        .body(Body::from("--B--\r\n"))
        .unwrap();

    let (status, _) = common::send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trailing_slash_is_ignored() {
    let app = common::app(common::connected_context());

    let (status, body) = common::get(app.clone(), "/api/v1/projects/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = common::get(app, "/api/v1/projects/p1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], "p1");
}

#[tokio::test]
async fn test_malformed_query_is_json_400() {
    let app = common::app(common::connected_context());

    let (status, body) = common::get(app, "/api/v1/projects?limit=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_upload_requires_multipart_body() {
    let app = common::app(common::connected_context());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/uploads")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = common::send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.http.upload_dir = dir.path().to_path_buf();
    config.http.upload_limit_bytes = 64;
    let app = common::app(portfolio_api::AppContext::with_store(
        config,
        common::seeded_store(),
    ));

    let body = format!(
        "--B\r\nContent-Disposition: form-data; name=\"file\"; filename=\"big.bin\"\r\n\r\n{}\r\n--B--\r\n",
        "x".repeat(1000)
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/uploads")
        .header("content-type", "multipart/form-data; boundary=B")
        .body(Body::from(body))
        .unwrap();

    let (status, body) = common::send(app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].is_string());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_slow_handler_times_out() {
    async fn slow() -> &'static str {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        "too late"
    }

    let config = HttpConfig {
        request_timeout_secs: 1,
        ..HttpConfig::default()
    };
    let router = apply_middleware(Router::new().route("/slow", get(slow)), &config);
    let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();

    let started = std::time::Instant::now();
    let (status, _) = common::send(router, request).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}
