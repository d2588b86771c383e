// src/api.rs
//! Minimal liveness surface for host-platform keep-alive checks. The
//! Prometheus exposition route is merged in by the binary.

use axum::{routing::get, Router};

pub fn create_router() -> Router {
    Router::new()
        .route("/", get(|| async { "I am alive!" }))
        .route("/health", get(|| async { "OK" }))
}
