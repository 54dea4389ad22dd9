//! Routing descriptor subsystem.
//!
//! # Data Flow
//! ```text
//! vercel.json
//!     → descriptor.rs (parse & validate)
//!     → router.rs (compile route patterns, in declaration order)
//!     → matcher.rs (evaluate path pattern AND method conditions)
//!     → Return: Resolved { route, dest, build } or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod descriptor;
pub mod matcher;
pub mod router;

pub use descriptor::{load_descriptor, Build, Descriptor, DescriptorError, Route};
pub use router::{DescriptorRouter, Resolved};
