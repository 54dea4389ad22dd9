//! Request-processing middleware owned by this crate.
//!
//! The rest of the stack (request ids, tracing, CORS, limits, timeouts)
//! comes from `tower-http` and is assembled in `server.rs`.

pub mod error;
