//! Platform browsing handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::api::AppState;
use crate::api::error::ApiError;

/// GET /api/platforms
///
/// Active platforms only; inactive ones stay reachable by id.
pub async fn list_platforms(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let platforms = state.storage.get_platforms()?;
    Ok(Json(platforms))
}

/// GET /api/platforms/{id}
pub async fn get_platform(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let platform = state
        .storage
        .get_platform_by_id(id)?
        .ok_or(ApiError::NotFound("Platform"))?;
    Ok(Json(platform))
}

/// GET /api/platforms/{id}/playlists
pub async fn get_platform_playlists(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .get_platform_by_id(id)?
        .ok_or(ApiError::NotFound("Platform"))?;

    let playlists = state.storage.get_playlists_by_platform_id(id)?;
    Ok(Json(playlists))
}
