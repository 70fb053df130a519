pub mod playlist;
pub mod playlist_tracks;
pub mod token;
pub mod user_playlists;
