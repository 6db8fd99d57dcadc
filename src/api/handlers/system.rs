//! System endpoints.

use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

/// GET /api/health
///
/// Liveness check, no authentication required.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
