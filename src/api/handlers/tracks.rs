//! Track and recommendation handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::api::session::CurrentUser;

/// GET /api/tracks
pub async fn list_tracks(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let tracks = state.storage.get_tracks()?;
    Ok(Json(tracks))
}

/// GET /api/tracks/{id}
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let track = state
        .storage
        .get_track_by_id(id)?
        .ok_or(ApiError::NotFound("Track"))?;
    Ok(Json(track))
}

/// GET /api/recommendations
///
/// Up to 5 tracks for the authenticated user: explicit recommendations
/// first (most recent first), padded with catalog tracks when sparse.
pub async fn get_recommendations(
    State(state): State<AppState>,
    auth: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let tracks = state.storage.get_recommendations_for_user(auth.user.id)?;
    Ok(Json(tracks))
}
