//! SQLite-backed storage: the normal runtime path.
//!
//! Connections are pooled through r2d2 and the schema is provisioned with
//! idempotent migrations at startup, session table included. Row structs
//! mirror the Diesel schema and convert into the domain models.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;

use crate::models::{
    NewPlatform, NewPlaylist, NewPlaylistTrack, NewRecommendation, NewTrack, NewUser, Platform,
    Playlist, PlaylistTrack, Recommendation, Track, User,
};
use crate::storage::schema::{
    platforms, playlist_tracks, playlists, recommendations, sessions, tracks, users,
};
use crate::storage::session::SessionStore;
use crate::storage::{RECOMMENDATION_LIMIT, Storage, StorageError};

/// Type alias for our connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Type alias for a pooled connection.
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite backend configuration.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    pub database_url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Connection timeout in seconds.
    pub connection_timeout: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_url: "cardj.db".to_string(),
            max_connections: 10,
            connection_timeout: 30,
        }
    }
}

impl SqliteConfig {
    /// Create a configuration for the given database path.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Build a connection pool from this configuration.
    pub fn build_pool(&self) -> Result<DbPool, StorageError> {
        let manager = ConnectionManager::<SqliteConnection>::new(&self.database_url);

        Ok(Pool::builder()
            .max_size(self.max_connections)
            .connection_timeout(Duration::from_secs(self.connection_timeout))
            .build(manager)?)
    }
}

/// Run the SQL migrations to set up the database schema.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    diesel::sql_query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(conn)?;

    diesel::sql_query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
        .execute(conn)?;

    diesel::sql_query(
        r#"
        CREATE TABLE IF NOT EXISTS platforms (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            api_key TEXT,
            active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
    )
    .execute(conn)?;

    diesel::sql_query(
        r#"
        CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            user_id INTEGER REFERENCES users(id),
            platform_id INTEGER REFERENCES platforms(id),
            name TEXT NOT NULL,
            description TEXT,
            cover_image TEXT,
            song_count INTEGER NOT NULL DEFAULT 0,
            external_id TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(conn)?;

    diesel::sql_query("CREATE INDEX IF NOT EXISTS idx_playlists_user_id ON playlists(user_id)")
        .execute(conn)?;

    diesel::sql_query(
        "CREATE INDEX IF NOT EXISTS idx_playlists_platform_id ON playlists(platform_id)",
    )
    .execute(conn)?;

    diesel::sql_query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            album TEXT,
            cover_image TEXT,
            genre TEXT,
            duration INTEGER,
            platform_id INTEGER REFERENCES platforms(id),
            external_id TEXT,
            audio_url TEXT
        )
        "#,
    )
    .execute(conn)?;

    diesel::sql_query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist_tracks (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            playlist_id INTEGER NOT NULL REFERENCES playlists(id),
            track_id INTEGER NOT NULL REFERENCES tracks(id),
            position INTEGER NOT NULL
        )
        "#,
    )
    .execute(conn)?;

    diesel::sql_query(
        "CREATE INDEX IF NOT EXISTS idx_playlist_tracks_playlist_id ON playlist_tracks(playlist_id)",
    )
    .execute(conn)?;

    diesel::sql_query(
        r#"
        CREATE TABLE IF NOT EXISTS recommendations (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users(id),
            track_id INTEGER NOT NULL REFERENCES tracks(id),
            reason TEXT,
            viewed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(conn)?;

    diesel::sql_query(
        "CREATE INDEX IF NOT EXISTS idx_recommendations_user_id ON recommendations(user_id)",
    )
    .execute(conn)?;

    // Session storage for the auth layer
    diesel::sql_query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            sid TEXT PRIMARY KEY NOT NULL,
            data TEXT NOT NULL,
            expires_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(conn)?;

    diesel::sql_query(
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)",
    )
    .execute(conn)?;

    Ok(())
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    password_hash: String,
    created_at: NaiveDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
struct NewUserRow<'a> {
    username: &'a str,
    email: &'a str,
    password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = platforms)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct PlatformRow {
    id: i32,
    name: String,
    icon: String,
    api_key: Option<String>,
    active: bool,
}

impl From<PlatformRow> for Platform {
    fn from(row: PlatformRow) -> Self {
        Platform {
            id: row.id,
            name: row.name,
            icon: row.icon,
            api_key: row.api_key,
            active: row.active,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = platforms)]
struct NewPlatformRow<'a> {
    name: &'a str,
    icon: &'a str,
    api_key: Option<&'a str>,
    active: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = playlists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct PlaylistRow {
    id: i32,
    user_id: Option<i32>,
    platform_id: Option<i32>,
    name: String,
    description: Option<String>,
    cover_image: Option<String>,
    song_count: i32,
    external_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<PlaylistRow> for Playlist {
    fn from(row: PlaylistRow) -> Self {
        Playlist {
            id: row.id,
            user_id: row.user_id,
            platform_id: row.platform_id,
            name: row.name,
            description: row.description,
            cover_image: row.cover_image,
            song_count: row.song_count,
            external_id: row.external_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = playlists)]
struct NewPlaylistRow<'a> {
    user_id: Option<i32>,
    platform_id: Option<i32>,
    name: &'a str,
    description: Option<&'a str>,
    cover_image: Option<&'a str>,
    song_count: i32,
    external_id: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tracks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct TrackRow {
    id: i32,
    title: String,
    artist: String,
    album: Option<String>,
    cover_image: Option<String>,
    genre: Option<String>,
    duration: Option<i32>,
    platform_id: Option<i32>,
    external_id: Option<String>,
    audio_url: Option<String>,
}

impl From<TrackRow> for Track {
    fn from(row: TrackRow) -> Self {
        Track {
            id: row.id,
            title: row.title,
            artist: row.artist,
            album: row.album,
            cover_image: row.cover_image,
            genre: row.genre,
            duration: row.duration,
            platform_id: row.platform_id,
            external_id: row.external_id,
            audio_url: row.audio_url,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tracks)]
struct NewTrackRow<'a> {
    title: &'a str,
    artist: &'a str,
    album: Option<&'a str>,
    cover_image: Option<&'a str>,
    genre: Option<&'a str>,
    duration: Option<i32>,
    platform_id: Option<i32>,
    external_id: Option<&'a str>,
    audio_url: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = playlist_tracks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct PlaylistTrackRow {
    id: i32,
    playlist_id: i32,
    track_id: i32,
    position: i32,
}

impl From<PlaylistTrackRow> for PlaylistTrack {
    fn from(row: PlaylistTrackRow) -> Self {
        PlaylistTrack {
            id: row.id,
            playlist_id: row.playlist_id,
            track_id: row.track_id,
            position: row.position,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = playlist_tracks)]
struct NewPlaylistTrackRow {
    playlist_id: i32,
    track_id: i32,
    position: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recommendations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct RecommendationRow {
    id: i32,
    user_id: i32,
    track_id: i32,
    reason: Option<String>,
    viewed: bool,
    created_at: NaiveDateTime,
}

impl From<RecommendationRow> for Recommendation {
    fn from(row: RecommendationRow) -> Self {
        Recommendation {
            id: row.id,
            user_id: row.user_id,
            track_id: row.track_id,
            reason: row.reason,
            viewed: row.viewed,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = recommendations)]
struct NewRecommendationRow<'a> {
    user_id: i32,
    track_id: i32,
    reason: Option<&'a str>,
    viewed: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sessions)]
struct SessionRow<'a> {
    sid: &'a str,
    data: &'a str,
    expires_at: NaiveDateTime,
}

// ============================================================================
// Storage implementation
// ============================================================================

/// SQLite-backed storage.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: DbPool,
    sessions: Arc<SqliteSessionStore>,
}

impl SqliteStorage {
    /// Open the pool, run migrations, and provision the session table.
    /// Any failure here is handled by the selector's fallback path.
    pub fn connect(config: &SqliteConfig) -> Result<Self, StorageError> {
        let pool = config.build_pool()?;

        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
        drop(conn);

        let sessions = Arc::new(SqliteSessionStore { pool: pool.clone() });
        Ok(Self { pool, sessions })
    }

    fn conn(&self) -> Result<DbConn, StorageError> {
        Ok(self.pool.get()?)
    }
}

impl Storage for SqliteStorage {
    fn get_user(&self, id: i32) -> Result<Option<User>, StorageError> {
        let mut conn = self.conn()?;

        let result = users::table
            .filter(users::id.eq(id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(result.map(User::from))
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let mut conn = self.conn()?;

        let result = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(result.map(User::from))
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let mut conn = self.conn()?;

        let result = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(result.map(User::from))
    }

    fn create_user(&self, new_user: &NewUser) -> Result<User, StorageError> {
        let mut conn = self.conn()?;

        // Surface collisions as constraint violations rather than raw
        // database errors
        let email_taken: i64 = users::table
            .filter(users::email.eq(&new_user.email))
            .count()
            .get_result(&mut conn)?;
        if email_taken > 0 {
            return Err(StorageError::UniqueViolation {
                field: "email",
                value: new_user.email.clone(),
            });
        }

        let username_taken: i64 = users::table
            .filter(users::username.eq(&new_user.username))
            .count()
            .get_result(&mut conn)?;
        if username_taken > 0 {
            return Err(StorageError::UniqueViolation {
                field: "username",
                value: new_user.username.clone(),
            });
        }

        diesel::insert_into(users::table)
            .values(&NewUserRow {
                username: &new_user.username,
                email: &new_user.email,
                password_hash: &new_user.password_hash,
            })
            .execute(&mut conn)?;

        // Fetch the created user by its unique email
        let row = users::table
            .filter(users::email.eq(&new_user.email))
            .select(UserRow::as_select())
            .first(&mut conn)?;

        Ok(User::from(row))
    }

    fn get_platforms(&self) -> Result<Vec<Platform>, StorageError> {
        let mut conn = self.conn()?;

        let results = platforms::table
            .filter(platforms::active.eq(true))
            .select(PlatformRow::as_select())
            .order(platforms::id.asc())
            .load(&mut conn)?;

        Ok(results.into_iter().map(Platform::from).collect())
    }

    fn get_platform_by_id(&self, id: i32) -> Result<Option<Platform>, StorageError> {
        let mut conn = self.conn()?;

        let result = platforms::table
            .filter(platforms::id.eq(id))
            .select(PlatformRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(result.map(Platform::from))
    }

    fn create_platform(&self, new_platform: &NewPlatform) -> Result<Platform, StorageError> {
        let mut conn = self.conn()?;

        diesel::insert_into(platforms::table)
            .values(&NewPlatformRow {
                name: &new_platform.name,
                icon: &new_platform.icon,
                api_key: new_platform.api_key.as_deref(),
                active: new_platform.active,
            })
            .execute(&mut conn)?;

        let row = platforms::table
            .select(PlatformRow::as_select())
            .order(platforms::id.desc())
            .first(&mut conn)?;

        Ok(Platform::from(row))
    }

    fn get_playlists(&self) -> Result<Vec<Playlist>, StorageError> {
        let mut conn = self.conn()?;

        let results = playlists::table
            .select(PlaylistRow::as_select())
            .order(playlists::id.asc())
            .load(&mut conn)?;

        Ok(results.into_iter().map(Playlist::from).collect())
    }

    fn get_playlist_by_id(&self, id: i32) -> Result<Option<Playlist>, StorageError> {
        let mut conn = self.conn()?;

        let result = playlists::table
            .filter(playlists::id.eq(id))
            .select(PlaylistRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(result.map(Playlist::from))
    }

    fn get_playlists_by_user_id(&self, user_id: i32) -> Result<Vec<Playlist>, StorageError> {
        let mut conn = self.conn()?;

        let results = playlists::table
            .filter(playlists::user_id.eq(user_id))
            .select(PlaylistRow::as_select())
            .order(playlists::id.asc())
            .load(&mut conn)?;

        Ok(results.into_iter().map(Playlist::from).collect())
    }

    fn get_playlists_by_platform_id(
        &self,
        platform_id: i32,
    ) -> Result<Vec<Playlist>, StorageError> {
        let mut conn = self.conn()?;

        let results = playlists::table
            .filter(playlists::platform_id.eq(platform_id))
            .select(PlaylistRow::as_select())
            .order(playlists::id.asc())
            .load(&mut conn)?;

        Ok(results.into_iter().map(Playlist::from).collect())
    }

    fn create_playlist(&self, new_playlist: &NewPlaylist) -> Result<Playlist, StorageError> {
        let mut conn = self.conn()?;

        diesel::insert_into(playlists::table)
            .values(&NewPlaylistRow {
                user_id: new_playlist.user_id,
                platform_id: new_playlist.platform_id,
                name: &new_playlist.name,
                description: new_playlist.description.as_deref(),
                cover_image: new_playlist.cover_image.as_deref(),
                song_count: new_playlist.song_count,
                external_id: new_playlist.external_id.as_deref(),
            })
            .execute(&mut conn)?;

        let row = playlists::table
            .select(PlaylistRow::as_select())
            .order(playlists::id.desc())
            .first(&mut conn)?;

        Ok(Playlist::from(row))
    }

    fn get_tracks(&self) -> Result<Vec<Track>, StorageError> {
        let mut conn = self.conn()?;

        let results = tracks::table
            .select(TrackRow::as_select())
            .order(tracks::id.asc())
            .load(&mut conn)?;

        Ok(results.into_iter().map(Track::from).collect())
    }

    fn get_track_by_id(&self, id: i32) -> Result<Option<Track>, StorageError> {
        let mut conn = self.conn()?;

        let result = tracks::table
            .filter(tracks::id.eq(id))
            .select(TrackRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(result.map(Track::from))
    }

    fn get_tracks_by_playlist_id(&self, playlist_id: i32) -> Result<Vec<Track>, StorageError> {
        let mut conn = self.conn()?;

        // Join through the membership table; position is the sole
        // ordering key
        let results = playlist_tracks::table
            .inner_join(tracks::table)
            .filter(playlist_tracks::playlist_id.eq(playlist_id))
            .order(playlist_tracks::position.asc())
            .select(TrackRow::as_select())
            .load(&mut conn)?;

        Ok(results.into_iter().map(Track::from).collect())
    }

    fn create_track(&self, new_track: &NewTrack) -> Result<Track, StorageError> {
        let mut conn = self.conn()?;

        diesel::insert_into(tracks::table)
            .values(&NewTrackRow {
                title: &new_track.title,
                artist: &new_track.artist,
                album: new_track.album.as_deref(),
                cover_image: new_track.cover_image.as_deref(),
                genre: new_track.genre.as_deref(),
                duration: new_track.duration,
                platform_id: new_track.platform_id,
                external_id: new_track.external_id.as_deref(),
                audio_url: new_track.audio_url.as_deref(),
            })
            .execute(&mut conn)?;

        let row = tracks::table
            .select(TrackRow::as_select())
            .order(tracks::id.desc())
            .first(&mut conn)?;

        Ok(Track::from(row))
    }

    fn add_track_to_playlist(
        &self,
        new_link: &NewPlaylistTrack,
    ) -> Result<PlaylistTrack, StorageError> {
        let mut conn = self.conn()?;

        diesel::insert_into(playlist_tracks::table)
            .values(&NewPlaylistTrackRow {
                playlist_id: new_link.playlist_id,
                track_id: new_link.track_id,
                position: new_link.position,
            })
            .execute(&mut conn)?;

        let row = playlist_tracks::table
            .select(PlaylistTrackRow::as_select())
            .order(playlist_tracks::id.desc())
            .first(&mut conn)?;

        Ok(PlaylistTrack::from(row))
    }

    fn get_recommendations_for_user(&self, user_id: i32) -> Result<Vec<Track>, StorageError> {
        let mut conn = self.conn()?;

        let explicit = recommendations::table
            .inner_join(tracks::table)
            .filter(recommendations::user_id.eq(user_id))
            .order((
                recommendations::created_at.desc(),
                recommendations::id.desc(),
            ))
            .limit(RECOMMENDATION_LIMIT as i64)
            .select(TrackRow::as_select())
            .load(&mut conn)?;

        let mut result: Vec<Track> = explicit.into_iter().map(Track::from).collect();

        // Best-effort fill: pad sparse recommendation data with arbitrary
        // tracks, no dedup against the explicit set
        if result.len() < RECOMMENDATION_LIMIT {
            let padding = tracks::table
                .select(TrackRow::as_select())
                .order(tracks::id.asc())
                .limit((RECOMMENDATION_LIMIT - result.len()) as i64)
                .load(&mut conn)?;

            result.extend(padding.into_iter().map(Track::from));
        }

        Ok(result)
    }

    fn create_recommendation(
        &self,
        new_rec: &NewRecommendation,
    ) -> Result<Recommendation, StorageError> {
        let mut conn = self.conn()?;

        diesel::insert_into(recommendations::table)
            .values(&NewRecommendationRow {
                user_id: new_rec.user_id,
                track_id: new_rec.track_id,
                reason: new_rec.reason.as_deref(),
                viewed: new_rec.viewed,
            })
            .execute(&mut conn)?;

        let row = recommendations::table
            .select(RecommendationRow::as_select())
            .order(recommendations::id.desc())
            .first(&mut conn)?;

        Ok(Recommendation::from(row))
    }

    fn session_store(&self) -> Arc<dyn SessionStore> {
        self.sessions.clone()
    }
}

// ============================================================================
// Session store
// ============================================================================

/// Sessions persisted in the `sessions` table, keyed by session id.
pub struct SqliteSessionStore {
    pool: DbPool,
}

impl SessionStore for SqliteSessionStore {
    fn load(&self, sid: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now().naive_utc();

        let result = sessions::table
            .filter(sessions::sid.eq(sid))
            .filter(sessions::expires_at.gt(now))
            .select(sessions::data)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(result)
    }

    fn save(&self, sid: &str, data: &str, expires_at: NaiveDateTime) -> Result<(), StorageError> {
        let mut conn = self.pool.get()?;

        diesel::replace_into(sessions::table)
            .values(&SessionRow {
                sid,
                data,
                expires_at,
            })
            .execute(&mut conn)?;

        Ok(())
    }

    fn destroy(&self, sid: &str) -> Result<(), StorageError> {
        let mut conn = self.pool.get()?;

        diesel::delete(sessions::table.filter(sessions::sid.eq(sid))).execute(&mut conn)?;

        Ok(())
    }

    fn prune_expired(&self) -> Result<usize, StorageError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now().naive_utc();

        let removed = diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
            .execute(&mut conn)?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SqliteConfig::default();
        assert_eq!(config.database_url, "cardj.db");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_in_memory_connect() {
        let config = SqliteConfig {
            database_url: ":memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        };
        assert!(SqliteStorage::connect(&config).is_ok());
    }

    #[test]
    fn test_connect_fails_for_unreachable_path() {
        let config = SqliteConfig {
            database_url: "/nonexistent-dir/cardj.db".to_string(),
            max_connections: 1,
            connection_timeout: 1,
        };
        assert!(SqliteStorage::connect(&config).is_err());
    }
}
