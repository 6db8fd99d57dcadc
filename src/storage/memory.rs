//! In-memory storage: the degraded-mode fallback.
//!
//! Tables are plain maps keyed by ids drawn from one sequential counter,
//! guarded by a mutex. This backend exists so the process still serves
//! requests when no database is reachable; data does not survive a
//! restart and cross-thread write contention is not a design concern.
//! Uniqueness checks mirror the SQLite backend's constraint behavior.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDateTime, Utc};

use crate::models::{
    NewPlatform, NewPlaylist, NewPlaylistTrack, NewRecommendation, NewTrack, NewUser, Platform,
    Playlist, PlaylistTrack, Recommendation, Track, User,
};
use crate::storage::session::SessionStore;
use crate::storage::{RECOMMENDATION_LIMIT, Storage, StorageError};

#[derive(Default)]
struct Tables {
    users: HashMap<i32, User>,
    platforms: HashMap<i32, Platform>,
    playlists: HashMap<i32, Playlist>,
    tracks: HashMap<i32, Track>,
    playlist_tracks: HashMap<i32, PlaylistTrack>,
    recommendations: HashMap<i32, Recommendation>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Map-based storage backend.
pub struct MemoryStorage {
    tables: Mutex<Tables>,
    sessions: Arc<MemorySessionStore>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            sessions: Arc::new(MemorySessionStore::new()),
        }
    }

    // A poisoned mutex only means another request panicked mid-write;
    // recover the guard rather than take the whole process down.
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect map values matching `filter`, in ascending id order.
fn collect_sorted<T: Clone>(
    map: &HashMap<i32, T>,
    mut filter: impl FnMut(&T) -> bool,
) -> Vec<T> {
    let mut ids: Vec<i32> = map
        .iter()
        .filter(|(_, v)| filter(v))
        .map(|(id, _)| *id)
        .collect();
    ids.sort_unstable();
    ids.into_iter().map(|id| map[&id].clone()).collect()
}

impl Storage for MemoryStorage {
    fn get_user(&self, id: i32) -> Result<Option<User>, StorageError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    fn create_user(&self, new_user: &NewUser) -> Result<User, StorageError> {
        let mut tables = self.lock();

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(StorageError::UniqueViolation {
                field: "email",
                value: new_user.email.clone(),
            });
        }
        if tables.users.values().any(|u| u.username == new_user.username) {
            return Err(StorageError::UniqueViolation {
                field: "username",
                value: new_user.username.clone(),
            });
        }

        let id = tables.next_id();
        let user = User {
            id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: Utc::now().naive_utc(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    fn get_platforms(&self) -> Result<Vec<Platform>, StorageError> {
        Ok(collect_sorted(&self.lock().platforms, |p| p.active))
    }

    fn get_platform_by_id(&self, id: i32) -> Result<Option<Platform>, StorageError> {
        Ok(self.lock().platforms.get(&id).cloned())
    }

    fn create_platform(&self, new_platform: &NewPlatform) -> Result<Platform, StorageError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let platform = Platform {
            id,
            name: new_platform.name.clone(),
            icon: new_platform.icon.clone(),
            api_key: new_platform.api_key.clone(),
            active: new_platform.active,
        };
        tables.platforms.insert(id, platform.clone());
        Ok(platform)
    }

    fn get_playlists(&self) -> Result<Vec<Playlist>, StorageError> {
        Ok(collect_sorted(&self.lock().playlists, |_| true))
    }

    fn get_playlist_by_id(&self, id: i32) -> Result<Option<Playlist>, StorageError> {
        Ok(self.lock().playlists.get(&id).cloned())
    }

    fn get_playlists_by_user_id(&self, user_id: i32) -> Result<Vec<Playlist>, StorageError> {
        Ok(collect_sorted(&self.lock().playlists, |p| {
            p.user_id == Some(user_id)
        }))
    }

    fn get_playlists_by_platform_id(
        &self,
        platform_id: i32,
    ) -> Result<Vec<Playlist>, StorageError> {
        Ok(collect_sorted(&self.lock().playlists, |p| {
            p.platform_id == Some(platform_id)
        }))
    }

    fn create_playlist(&self, new_playlist: &NewPlaylist) -> Result<Playlist, StorageError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let now = Utc::now().naive_utc();
        let playlist = Playlist {
            id,
            user_id: new_playlist.user_id,
            platform_id: new_playlist.platform_id,
            name: new_playlist.name.clone(),
            description: new_playlist.description.clone(),
            cover_image: new_playlist.cover_image.clone(),
            song_count: new_playlist.song_count,
            external_id: new_playlist.external_id.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.playlists.insert(id, playlist.clone());
        Ok(playlist)
    }

    fn get_tracks(&self) -> Result<Vec<Track>, StorageError> {
        Ok(collect_sorted(&self.lock().tracks, |_| true))
    }

    fn get_track_by_id(&self, id: i32) -> Result<Option<Track>, StorageError> {
        Ok(self.lock().tracks.get(&id).cloned())
    }

    fn get_tracks_by_playlist_id(&self, playlist_id: i32) -> Result<Vec<Track>, StorageError> {
        let tables = self.lock();

        let mut links: Vec<&PlaylistTrack> = tables
            .playlist_tracks
            .values()
            .filter(|pt| pt.playlist_id == playlist_id)
            .collect();
        links.sort_by_key(|pt| pt.position);

        Ok(links
            .into_iter()
            .filter_map(|pt| tables.tracks.get(&pt.track_id).cloned())
            .collect())
    }

    fn create_track(&self, new_track: &NewTrack) -> Result<Track, StorageError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let track = Track {
            id,
            title: new_track.title.clone(),
            artist: new_track.artist.clone(),
            album: new_track.album.clone(),
            cover_image: new_track.cover_image.clone(),
            genre: new_track.genre.clone(),
            duration: new_track.duration,
            platform_id: new_track.platform_id,
            external_id: new_track.external_id.clone(),
            audio_url: new_track.audio_url.clone(),
        };
        tables.tracks.insert(id, track.clone());
        Ok(track)
    }

    fn add_track_to_playlist(
        &self,
        new_link: &NewPlaylistTrack,
    ) -> Result<PlaylistTrack, StorageError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let link = PlaylistTrack {
            id,
            playlist_id: new_link.playlist_id,
            track_id: new_link.track_id,
            position: new_link.position,
        };
        tables.playlist_tracks.insert(id, link.clone());
        Ok(link)
    }

    fn get_recommendations_for_user(&self, user_id: i32) -> Result<Vec<Track>, StorageError> {
        let tables = self.lock();

        let mut recs: Vec<&Recommendation> = tables
            .recommendations
            .values()
            .filter(|rec| rec.user_id == user_id)
            .collect();
        // Most recent first, id as tiebreak for same-instant rows
        recs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let mut result: Vec<Track> = recs
            .into_iter()
            .filter_map(|rec| tables.tracks.get(&rec.track_id).cloned())
            .take(RECOMMENDATION_LIMIT)
            .collect();

        // Pad sparse recommendation data with arbitrary tracks, no dedup
        // against the explicit set
        if result.len() < RECOMMENDATION_LIMIT {
            let deficit = RECOMMENDATION_LIMIT - result.len();
            let padding = collect_sorted(&tables.tracks, |_| true);
            result.extend(padding.into_iter().take(deficit));
        }

        Ok(result)
    }

    fn create_recommendation(
        &self,
        new_rec: &NewRecommendation,
    ) -> Result<Recommendation, StorageError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let rec = Recommendation {
            id,
            user_id: new_rec.user_id,
            track_id: new_rec.track_id,
            reason: new_rec.reason.clone(),
            viewed: new_rec.viewed,
            created_at: Utc::now().naive_utc(),
        };
        tables.recommendations.insert(id, rec.clone());
        Ok(rec)
    }

    fn session_store(&self) -> Arc<dyn SessionStore> {
        self.sessions.clone()
    }
}

// ============================================================================
// Session store
// ============================================================================

/// In-process session store for degraded mode. Expired entries read as
/// absent immediately; bulk removal happens through `prune_expired`,
/// which the server calls on a fixed interval.
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, (String, NaiveDateTime)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (String, NaiveDateTime)>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, sid: &str) -> Result<Option<String>, StorageError> {
        let now = Utc::now().naive_utc();
        Ok(self
            .lock()
            .get(sid)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(data, _)| data.clone()))
    }

    fn save(&self, sid: &str, data: &str, expires_at: NaiveDateTime) -> Result<(), StorageError> {
        self.lock()
            .insert(sid.to_string(), (data.to_string(), expires_at));
        Ok(())
    }

    fn destroy(&self, sid: &str) -> Result<(), StorageError> {
        self.lock().remove(sid);
        Ok(())
    }

    fn prune_expired(&self) -> Result<usize, StorageError> {
        let now = Utc::now().naive_utc();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_across_tables() {
        // One counter serves every table, as in the original store
        let storage = MemoryStorage::new();
        let user = storage
            .create_user(&NewUser {
                username: "a".into(),
                email: "a@example.com".into(),
                password_hash: "h".into(),
            })
            .unwrap();
        let platform = storage
            .create_platform(&NewPlatform {
                name: "Spotify".into(),
                icon: "ri-spotify-line".into(),
                api_key: None,
                active: true,
            })
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(platform.id, 2);
    }

    #[test]
    fn test_missing_track_links_are_skipped() {
        let storage = MemoryStorage::new();
        let playlist = storage
            .create_playlist(&NewPlaylist {
                user_id: None,
                platform_id: None,
                name: "Mix".into(),
                description: None,
                cover_image: None,
                song_count: 0,
                external_id: None,
            })
            .unwrap();

        // Link pointing at a track id that was never created
        storage
            .add_track_to_playlist(&NewPlaylistTrack {
                playlist_id: playlist.id,
                track_id: 9999,
                position: 1,
            })
            .unwrap();

        assert!(storage.get_tracks_by_playlist_id(playlist.id).unwrap().is_empty());
    }
}
