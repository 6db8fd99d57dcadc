//! API handlers, grouped by domain.

pub mod auth;
pub mod platforms;
pub mod playlists;
pub mod system;
pub mod tracks;

pub use auth::{get_current_user, login, logout, register};
pub use platforms::{get_platform, get_platform_playlists, list_platforms};
pub use playlists::{get_my_playlists, get_playlist, get_playlist_tracks, list_playlists};
pub use system::health;
pub use tracks::{get_recommendations, get_track, list_tracks};
