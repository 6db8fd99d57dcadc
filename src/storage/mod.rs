//! Storage core: capability contract, backends, and backend selection.
//!
//! Two backends implement the [`Storage`] trait: a SQLite-backed store
//! (the normal runtime path) and an in-memory fallback used when no
//! database is reachable at startup. Both must be behaviorally equivalent
//! for equivalent state; the contract tests at the bottom of this module
//! run against each.

pub mod memory;
pub mod schema;
pub mod session;
pub mod sqlite;

use std::sync::Arc;

use thiserror::Error;

use crate::models::{
    NewPlatform, NewPlaylist, NewPlaylistTrack, NewRecommendation, NewTrack, NewUser, Platform,
    Playlist, PlaylistTrack, Recommendation, Track, User,
};

pub use memory::MemoryStorage;
pub use session::SessionStore;
pub use sqlite::{SqliteConfig, SqliteStorage};

/// Maximum number of tracks returned by recommendation queries.
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("{field} already exists: {value}")]
    UniqueViolation { field: &'static str, value: String },
}

impl StorageError {
    /// True if this error is a uniqueness-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StorageError::UniqueViolation { .. })
    }
}

/// Capability contract that every storage backend satisfies.
///
/// Lookup-by-id operations return `Ok(None)` when no row matches; absence
/// is never an error at this layer. Listing operations without a domain
/// ordering return rows in ascending id order so both backends agree.
pub trait Storage: Send + Sync {
    // User operations
    fn get_user(&self, id: i32) -> Result<Option<User>, StorageError>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;
    /// Insert a user. Fails with [`StorageError::UniqueViolation`] when the
    /// username or email is already taken.
    fn create_user(&self, new_user: &NewUser) -> Result<User, StorageError>;

    // Platform operations
    /// Only platforms with `active = true` are listed.
    fn get_platforms(&self) -> Result<Vec<Platform>, StorageError>;
    fn get_platform_by_id(&self, id: i32) -> Result<Option<Platform>, StorageError>;
    fn create_platform(&self, new_platform: &NewPlatform) -> Result<Platform, StorageError>;

    // Playlist operations
    fn get_playlists(&self) -> Result<Vec<Playlist>, StorageError>;
    fn get_playlist_by_id(&self, id: i32) -> Result<Option<Playlist>, StorageError>;
    fn get_playlists_by_user_id(&self, user_id: i32) -> Result<Vec<Playlist>, StorageError>;
    fn get_playlists_by_platform_id(
        &self,
        platform_id: i32,
    ) -> Result<Vec<Playlist>, StorageError>;
    fn create_playlist(&self, new_playlist: &NewPlaylist) -> Result<Playlist, StorageError>;

    // Track operations
    fn get_tracks(&self) -> Result<Vec<Track>, StorageError>;
    fn get_track_by_id(&self, id: i32) -> Result<Option<Track>, StorageError>;
    /// Tracks of a playlist, ordered by ascending `position` of their
    /// playlist-track rows.
    fn get_tracks_by_playlist_id(&self, playlist_id: i32) -> Result<Vec<Track>, StorageError>;
    fn create_track(&self, new_track: &NewTrack) -> Result<Track, StorageError>;
    fn add_track_to_playlist(
        &self,
        new_link: &NewPlaylistTrack,
    ) -> Result<PlaylistTrack, StorageError>;

    // Recommendation operations
    /// Best-effort fill: up to [`RECOMMENDATION_LIMIT`] tracks, explicit
    /// recommendations first (most recent first), padded with arbitrary
    /// tracks when fewer exist. Padding makes no uniqueness guarantee.
    fn get_recommendations_for_user(&self, user_id: i32) -> Result<Vec<Track>, StorageError>;
    fn create_recommendation(
        &self,
        new_rec: &NewRecommendation,
    ) -> Result<Recommendation, StorageError>;

    /// Session store associated with this backend.
    fn session_store(&self) -> Arc<dyn SessionStore>;
}

/// Configuration consumed by the backend selector.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Path to the SQLite database file. `None` selects the in-memory
    /// fallback directly.
    pub database_url: Option<String>,
}

impl StorageConfig {
    pub fn new(database_url: Option<String>) -> Self {
        Self { database_url }
    }
}

/// Select a storage backend, favoring availability over durability.
///
/// Attempts to construct the SQLite backend (open the pool, run
/// migrations, provision the session table); on any failure, or when no
/// database URL is configured, falls back to the in-memory store. There
/// is no recovery path back to the persistent backend within a process
/// lifetime; restart to retry.
pub fn connect(config: &StorageConfig) -> Arc<dyn Storage> {
    match &config.database_url {
        Some(url) => match SqliteStorage::connect(&SqliteConfig::new(url)) {
            Ok(storage) => {
                tracing::info!("SQLite database connection established: {}", url);
                Arc::new(storage)
            }
            Err(e) => {
                tracing::warn!("Failed to open database {}: {}", url, e);
                tracing::warn!("Falling back to in-memory storage (data will not persist)");
                Arc::new(MemoryStorage::new())
            }
        },
        None => {
            tracing::warn!("No database configured, using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
        }
    }

    fn new_platform(name: &str, active: bool) -> NewPlatform {
        NewPlatform {
            name: name.to_string(),
            icon: "ri-music-line".to_string(),
            api_key: None,
            active,
        }
    }

    fn new_track(title: &str) -> NewTrack {
        NewTrack {
            title: title.to_string(),
            artist: "Test Artist".to_string(),
            album: None,
            cover_image: None,
            genre: None,
            duration: Some(200),
            platform_id: None,
            external_id: None,
            audio_url: None,
        }
    }

    fn new_playlist(name: &str, platform_id: Option<i32>) -> NewPlaylist {
        NewPlaylist {
            user_id: None,
            platform_id,
            name: name.to_string(),
            description: None,
            cover_image: None,
            song_count: 0,
            external_id: None,
        }
    }

    /// In-memory SQLite backend for contract tests. A single pooled
    /// connection keeps every query on the same `:memory:` database.
    fn sqlite_backend() -> SqliteStorage {
        let config = SqliteConfig {
            database_url: ":memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        };
        SqliteStorage::connect(&config).expect("in-memory sqlite backend")
    }

    fn both_backends() -> Vec<Box<dyn Storage>> {
        vec![Box::new(MemoryStorage::new()), Box::new(sqlite_backend())]
    }

    fn check_user_roundtrip(storage: &dyn Storage) {
        let created = storage
            .create_user(&new_user("alice", "alice@example.com"))
            .unwrap();
        assert!(created.id >= 1);

        let fetched = storage.get_user(created.id).unwrap().unwrap();
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.password_hash, "$argon2id$fake");
        assert_eq!(fetched.created_at, created.created_at);

        let by_name = storage.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        let by_email = storage
            .get_user_by_email("alice@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(storage.get_user(9999).unwrap().is_none());
        assert!(storage.get_user_by_username("nobody").unwrap().is_none());
    }

    fn check_duplicate_user_rejected(storage: &dyn Storage) {
        let first = storage
            .create_user(&new_user("bob", "bob@example.com"))
            .unwrap();

        let dup_email = storage.create_user(&new_user("robert", "bob@example.com"));
        assert!(dup_email.unwrap_err().is_unique_violation());

        let dup_name = storage.create_user(&new_user("bob", "other@example.com"));
        assert!(dup_name.unwrap_err().is_unique_violation());

        // First user is unaffected by the failed inserts
        let fetched = storage.get_user(first.id).unwrap().unwrap();
        assert_eq!(fetched.username, "bob");
    }

    fn check_only_active_platforms_listed(storage: &dyn Storage) {
        storage.create_platform(&new_platform("Spotify", true)).unwrap();
        let inactive = storage
            .create_platform(&new_platform("Grooveshark", false))
            .unwrap();
        storage.create_platform(&new_platform("YouTube Music", true)).unwrap();

        let listed = storage.get_platforms().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|p| p.active));

        // Inactive platforms remain reachable by id
        let fetched = storage.get_platform_by_id(inactive.id).unwrap().unwrap();
        assert!(!fetched.active);
    }

    fn check_playlist_tracks_ordered_by_position(storage: &dyn Storage) {
        let platform = storage.create_platform(&new_platform("Spotify", true)).unwrap();
        let playlist = storage
            .create_playlist(&new_playlist("Road Trip", Some(platform.id)))
            .unwrap();

        let first = storage.create_track(&new_track("Opening")).unwrap();
        let second = storage.create_track(&new_track("Middle")).unwrap();
        let third = storage.create_track(&new_track("Closing")).unwrap();

        // Insert out of order; position alone decides the result order
        for (track_id, position) in [(third.id, 3), (first.id, 1), (second.id, 2)] {
            storage
                .add_track_to_playlist(&NewPlaylistTrack {
                    playlist_id: playlist.id,
                    track_id,
                    position,
                })
                .unwrap();
        }

        let ordered = storage.get_tracks_by_playlist_id(playlist.id).unwrap();
        let titles: Vec<&str> = ordered.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Opening", "Middle", "Closing"]);

        assert!(storage.get_tracks_by_playlist_id(9999).unwrap().is_empty());
    }

    fn check_recommendations_filled_to_limit(storage: &dyn Storage) {
        let user = storage
            .create_user(&new_user("carol", "carol@example.com"))
            .unwrap();

        let mut track_ids = Vec::new();
        for i in 0..8 {
            let track = storage.create_track(&new_track(&format!("Track {i}"))).unwrap();
            track_ids.push(track.id);
        }

        // Two explicit recommendations; the rest of the limit is padding
        storage
            .create_recommendation(&NewRecommendation {
                user_id: user.id,
                track_id: track_ids[6],
                reason: Some("Because you liked Track 1".to_string()),
                viewed: false,
            })
            .unwrap();
        storage
            .create_recommendation(&NewRecommendation {
                user_id: user.id,
                track_id: track_ids[7],
                reason: None,
                viewed: false,
            })
            .unwrap();

        let recs = storage.get_recommendations_for_user(user.id).unwrap();
        assert_eq!(recs.len(), RECOMMENDATION_LIMIT);

        // Explicit recommendations come first, padding after
        let explicit: Vec<i32> = recs[..2].iter().map(|t| t.id).collect();
        assert!(explicit.contains(&track_ids[6]));
        assert!(explicit.contains(&track_ids[7]));
        let padding: Vec<i32> = recs[2..].iter().map(|t| t.id).collect();
        assert_eq!(padding, track_ids[..3].to_vec());
    }

    fn check_recommendations_limited_by_track_pool(storage: &dyn Storage) {
        let user = storage
            .create_user(&new_user("dave", "dave@example.com"))
            .unwrap();

        // No explicit recommendations, three tracks total: the fill
        // degrades to min(limit, pool)
        for i in 0..3 {
            storage.create_track(&new_track(&format!("Track {i}"))).unwrap();
        }
        let recs = storage.get_recommendations_for_user(user.id).unwrap();
        assert_eq!(recs.len(), 3);
    }

    fn check_recommendations_empty_pool(storage: &dyn Storage) {
        let user = storage
            .create_user(&new_user("dana", "dana@example.com"))
            .unwrap();
        // No tracks at all: empty result, not an error
        assert!(storage.get_recommendations_for_user(user.id).unwrap().is_empty());
    }

    fn check_playlists_filtered_by_owner_and_platform(storage: &dyn Storage) {
        let user = storage
            .create_user(&new_user("erin", "erin@example.com"))
            .unwrap();
        let platform = storage.create_platform(&new_platform("Spotify", true)).unwrap();

        let mine = storage
            .create_playlist(&NewPlaylist {
                user_id: Some(user.id),
                ..new_playlist("Mine", Some(platform.id))
            })
            .unwrap();
        storage.create_playlist(&new_playlist("Orphan", None)).unwrap();

        let by_user = storage.get_playlists_by_user_id(user.id).unwrap();
        assert_eq!(by_user.len(), 1);
        assert_eq!(by_user[0].id, mine.id);

        let by_platform = storage.get_playlists_by_platform_id(platform.id).unwrap();
        assert_eq!(by_platform.len(), 1);
        assert_eq!(by_platform[0].id, mine.id);

        assert_eq!(storage.get_playlists().unwrap().len(), 2);
    }

    #[test]
    fn test_user_roundtrip_both_backends() {
        for storage in both_backends() {
            check_user_roundtrip(storage.as_ref());
        }
    }

    #[test]
    fn test_duplicate_user_rejected_both_backends() {
        for storage in both_backends() {
            check_duplicate_user_rejected(storage.as_ref());
        }
    }

    #[test]
    fn test_only_active_platforms_listed_both_backends() {
        for storage in both_backends() {
            check_only_active_platforms_listed(storage.as_ref());
        }
    }

    #[test]
    fn test_playlist_tracks_ordered_by_position_both_backends() {
        for storage in both_backends() {
            check_playlist_tracks_ordered_by_position(storage.as_ref());
        }
    }

    #[test]
    fn test_recommendations_filled_to_limit_both_backends() {
        for storage in both_backends() {
            check_recommendations_filled_to_limit(storage.as_ref());
        }
    }

    #[test]
    fn test_recommendations_limited_by_track_pool_both_backends() {
        for storage in both_backends() {
            check_recommendations_limited_by_track_pool(storage.as_ref());
        }
    }

    #[test]
    fn test_recommendations_empty_pool_both_backends() {
        for storage in both_backends() {
            check_recommendations_empty_pool(storage.as_ref());
        }
    }

    #[test]
    fn test_playlists_filtered_both_backends() {
        for storage in both_backends() {
            check_playlists_filtered_by_owner_and_platform(storage.as_ref());
        }
    }

    #[test]
    fn test_selector_falls_back_without_database_url() {
        let storage = connect(&StorageConfig::new(None));
        // The degraded process still serves user operations
        let created = storage
            .create_user(&new_user("fallback", "fallback@example.com"))
            .unwrap();
        let fetched = storage.get_user(created.id).unwrap().unwrap();
        assert_eq!(fetched.email, "fallback@example.com");
    }

    #[test]
    fn test_selector_falls_back_on_unreachable_database() {
        let config = StorageConfig::new(Some("/nonexistent-dir/cardj.db".to_string()));
        let storage = connect(&config);
        storage
            .create_user(&new_user("degraded", "degraded@example.com"))
            .unwrap();
        assert!(storage.get_user_by_username("degraded").unwrap().is_some());
    }

    #[test]
    fn test_session_store_roundtrip_both_backends() {
        for storage in both_backends() {
            let sessions = storage.session_store();
            let future = Utc::now().naive_utc() + Duration::hours(1);
            let past = Utc::now().naive_utc() - Duration::hours(1);

            sessions.save("sid-1", "{\"userId\":1}", future).unwrap();
            assert_eq!(
                sessions.load("sid-1").unwrap().as_deref(),
                Some("{\"userId\":1}")
            );

            // Saving again replaces the blob
            sessions.save("sid-1", "{\"userId\":2}", future).unwrap();
            assert_eq!(
                sessions.load("sid-1").unwrap().as_deref(),
                Some("{\"userId\":2}")
            );

            // Expired sessions read as absent and are pruned
            sessions.save("sid-2", "{}", past).unwrap();
            assert!(sessions.load("sid-2").unwrap().is_none());
            assert_eq!(sessions.prune_expired().unwrap(), 1);

            sessions.destroy("sid-1").unwrap();
            assert!(sessions.load("sid-1").unwrap().is_none());
        }
    }
}
