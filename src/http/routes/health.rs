//! Liveness and database status.
//!
//! Always answers 200 while the process is up; a missing database shows as
//! `"status": "degraded"`.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::context::{AppContext, StoreHandle};

pub async fn health(State(ctx): State<AppContext>) -> Json<Value> {
    let body = match &ctx.store {
        StoreHandle::Connected(store) => json!({
            "status": "ok",
            "database": { "status": "connected", "kind": store.kind() },
        }),
        StoreHandle::Unavailable { reason } => json!({
            "status": "degraded",
            "database": { "status": "unavailable", "reason": &**reason },
        }),
    };
    Json(body)
}
