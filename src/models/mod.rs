//! Domain models for CarDJ.

pub mod catalog;
pub mod user;

pub use catalog::{
    NewPlatform, NewPlaylist, NewPlaylistTrack, NewRecommendation, NewTrack, Platform, Playlist,
    PlaylistTrack, Recommendation, Track,
};
pub use user::{NewUser, User, UserResponse};
