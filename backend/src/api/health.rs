//! Liveness endpoints

use axum::Json;
use serde::Serialize;

/// Greeting returned by `GET /`
#[derive(Debug, Serialize)]
pub struct HelloResponse {
    /// Greeting text
    pub message: String,
    /// Always "ok"
    pub status: String,
}

/// Health report returned by `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable message
    pub message: String,
}

/// GET / - Greeting
pub async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Companies API".to_string(),
        status: "ok".to_string(),
    })
}

/// GET /api/health - Health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}
