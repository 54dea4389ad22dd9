//! IJ portfolio backend API.
//!
//! An axum application (welcome payload, read-only collections, uploads)
//! wrapped by a request adapter so a serverless host can drive it, plus a
//! local dev host that emulates the platform's routing descriptor.

pub mod adapter;
pub mod config;
pub mod context;
pub mod dev;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod storage;

pub use adapter::{Adapter, HostRequest, HostResponse};
pub use config::AppConfig;
pub use context::AppContext;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
