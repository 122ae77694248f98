//! Liveness endpoint.
//!
//! Deliberately touches no state: it answers even when the database is
//! unreachable, so orchestrators can tell a dead process from a degraded
//! one.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::AppState;

/// GET /health - Reports the service name and build version.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "centime",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
