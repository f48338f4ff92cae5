//! Service-level endpoints: welcome document, health check, 404 fallback.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::route_not_found_body;
use crate::state::AppState;

/// Describe the service and where to find things.
///
/// GET /
#[utoipa::path(get, path = "/", tag = "System",
    responses((status = 200, description = "Service description")))]
pub async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Noted API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "notes": "/api/notes",
            "health": "/health",
            "documentation": "/api-docs",
        },
        "features": [
            "Create and manage notes",
            "Search functionality",
            "Category organization",
            "Pin important notes",
            "Archive notes",
        ],
    }))
}

/// Liveness plus database reachability.
///
/// Answers 200 `status: "OK"` while the store responds, 503
/// `status: "DEGRADED"` otherwise.
///
/// GET /health
#[utoipa::path(get, path = "/health", tag = "System",
    responses(
        (status = 200, description = "Service and database are up"),
        (status = 503, description = "Database unreachable"),
    ))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, label, database) = match state.notes.health().await {
        Ok(()) => (StatusCode::OK, "OK", "connected"),
        Err(e) => {
            warn!(
                subsystem = "api",
                component = "health",
                error = %e,
                "Database health probe failed"
            );
            (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED", "disconnected")
        }
    };

    (
        status,
        Json(json!({
            "status": label,
            "timestamp": Utc::now().to_rfc3339(),
            "uptime": state.started_at.elapsed().as_secs_f64(),
            "database": database,
        })),
    )
}

/// Fallback for unmatched routes.
pub async fn route_not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    (StatusCode::NOT_FOUND, Json(route_not_found_body(path)))
}
