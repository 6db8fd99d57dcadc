//! Playlist browsing handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::api::session::CurrentUser;

/// GET /api/playlists
pub async fn list_playlists(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let playlists = state.storage.get_playlists()?;
    Ok(Json(playlists))
}

/// GET /api/playlists/{id}
pub async fn get_playlist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let playlist = state
        .storage
        .get_playlist_by_id(id)?
        .ok_or(ApiError::NotFound("Playlist"))?;
    Ok(Json(playlist))
}

/// GET /api/playlists/{id}/tracks
///
/// Tracks in playlist order (ascending position).
pub async fn get_playlist_tracks(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .get_playlist_by_id(id)?
        .ok_or(ApiError::NotFound("Playlist"))?;

    let tracks = state.storage.get_tracks_by_playlist_id(id)?;
    Ok(Json(tracks))
}

/// GET /api/me/playlists
///
/// Playlists owned by the authenticated user.
pub async fn get_my_playlists(
    State(state): State<AppState>,
    auth: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let playlists = state.storage.get_playlists_by_user_id(auth.user.id)?;
    Ok(Json(playlists))
}
