//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (serve/dev) or host event (adapter)
//!     → server.rs (middleware stack)
//!     → request.rs (request ID assigned and propagated)
//!     → routes/ (welcome, health, collections, uploads)
//!     → response.rs (errors mapped to JSON or the fixed 500)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{AppError, SOMETHING_BROKE};
pub use server::HttpServer;
