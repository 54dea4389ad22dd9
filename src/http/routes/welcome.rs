//! Root welcome payload.

use axum::Json;
use serde::{Deserialize, Serialize};

use super::{API_PREFIX, COLLECTIONS};

pub const WELCOME_MESSAGE: &str = "Welcome to the IJ portfolio backend API!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
    pub version: String,
    /// One `"GET /api/v1/<collection>"` entry per collection.
    pub endpoints: Vec<String>,
}

pub fn welcome_payload() -> Welcome {
    Welcome {
        message: WELCOME_MESSAGE.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: COLLECTIONS
            .iter()
            .map(|c| format!("GET {}/{}", API_PREFIX, c))
            .collect(),
    }
}

pub async fn welcome() -> Json<Welcome> {
    Json(welcome_payload())
}
