//! Database schema definitions for Diesel.

diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
        email -> Text,
        password_hash -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    platforms (id) {
        id -> Integer,
        name -> Text,
        icon -> Text,
        api_key -> Nullable<Text>,
        active -> Bool,
    }
}

diesel::table! {
    playlists (id) {
        id -> Integer,
        user_id -> Nullable<Integer>,
        platform_id -> Nullable<Integer>,
        name -> Text,
        description -> Nullable<Text>,
        cover_image -> Nullable<Text>,
        song_count -> Integer,
        external_id -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    tracks (id) {
        id -> Integer,
        title -> Text,
        artist -> Text,
        album -> Nullable<Text>,
        cover_image -> Nullable<Text>,
        genre -> Nullable<Text>,
        duration -> Nullable<Integer>,
        platform_id -> Nullable<Integer>,
        external_id -> Nullable<Text>,
        audio_url -> Nullable<Text>,
    }
}

diesel::table! {
    playlist_tracks (id) {
        id -> Integer,
        playlist_id -> Integer,
        track_id -> Integer,
        position -> Integer,
    }
}

diesel::table! {
    recommendations (id) {
        id -> Integer,
        user_id -> Integer,
        track_id -> Integer,
        reason -> Nullable<Text>,
        viewed -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    sessions (sid) {
        sid -> Text,
        data -> Text,
        expires_at -> Timestamp,
    }
}

// Define foreign key relationships
diesel::joinable!(playlists -> users (user_id));
diesel::joinable!(playlists -> platforms (platform_id));
diesel::joinable!(playlist_tracks -> playlists (playlist_id));
diesel::joinable!(playlist_tracks -> tracks (track_id));
diesel::joinable!(recommendations -> users (user_id));
diesel::joinable!(recommendations -> tracks (track_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    platforms,
    playlists,
    tracks,
    playlist_tracks,
    recommendations,
);
