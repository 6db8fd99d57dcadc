//! Catalog models: platforms, playlists, tracks, and recommendations.

use chrono::NaiveDateTime;
use serde::Serialize;

/// An external music source (Spotify, YouTube Music, ...).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: i32,
    pub name: String,
    pub icon: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub active: bool,
}

/// Data for inserting a new platform.
#[derive(Debug, Clone)]
pub struct NewPlatform {
    pub name: String,
    pub icon: String,
    pub api_key: Option<String>,
    pub active: bool,
}

/// A playlist, optionally owned by a user and sourced from a platform.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: i32,
    pub user_id: Option<i32>,
    pub platform_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub song_count: i32,
    /// Identifier of the playlist on its source platform.
    pub external_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data for inserting a new playlist.
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub user_id: Option<i32>,
    pub platform_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub song_count: i32,
    pub external_id: Option<String>,
}

/// A track. Platform linkage and playback metadata are optional.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: i32,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub cover_image: Option<String>,
    pub genre: Option<String>,
    /// Duration in seconds.
    pub duration: Option<i32>,
    pub platform_id: Option<i32>,
    pub external_id: Option<String>,
    pub audio_url: Option<String>,
}

/// Data for inserting a new track.
#[derive(Debug, Clone)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub cover_image: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<i32>,
    pub platform_id: Option<i32>,
    pub external_id: Option<String>,
    pub audio_url: Option<String>,
}

/// Membership of a track in a playlist. `position` is the sole ordering
/// key within a playlist; storage insertion order is irrelevant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTrack {
    pub id: i32,
    pub playlist_id: i32,
    pub track_id: i32,
    pub position: i32,
}

/// Data for linking a track into a playlist.
#[derive(Debug, Clone)]
pub struct NewPlaylistTrack {
    pub playlist_id: i32,
    pub track_id: i32,
    pub position: i32,
}

/// A recommendation of a track for a user. `created_at` is the recency
/// key used when selecting recommendations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: i32,
    pub user_id: i32,
    pub track_id: i32,
    pub reason: Option<String>,
    pub viewed: bool,
    pub created_at: NaiveDateTime,
}

/// Data for inserting a new recommendation.
#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub user_id: i32,
    pub track_id: i32,
    pub reason: Option<String>,
    pub viewed: bool,
}
