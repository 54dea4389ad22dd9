//! Route handlers.
//!
//! ```text
//! GET  /                              welcome.rs
//! GET  /health                        health.rs
//! GET  /api/v1/{collection}           resources.rs
//! GET  /api/v1/{collection}/{id}      resources.rs
//! POST /api/v1/uploads                uploads.rs
//! ```

pub mod health;
pub mod resources;
pub mod uploads;
pub mod welcome;

/// Version prefix shared by every API route.
pub const API_PREFIX: &str = "/api/v1";

/// The ten read-only collections served under `API_PREFIX`.
pub const COLLECTIONS: [&str; 10] = [
    "profile",
    "projects",
    "skills",
    "experiences",
    "education",
    "certifications",
    "testimonials",
    "services",
    "blogs",
    "socials",
];
