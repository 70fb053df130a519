use std::collections::HashMap;

use tracing::warn;

use crate::error::Error;
use crate::spotify::api_types;

/// Playlist metadata needed by the mirror flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// First cover image, when the playlist has any
    pub cover_url: Option<String>,
    pub total_tracks: u32,
}

impl From<api_types::playlist::Root> for Playlist {
    fn from(value: api_types::playlist::Root) -> Self {
        Playlist {
            id: value.id,
            name: value.name,
            cover_url: value.images.into_iter().next().map(|image| image.url),
            total_tracks: value.tracks.total,
        }
    }
}

/// One entry of the user's playlist listing.
#[derive(Debug, PartialEq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub total_tracks: u32,
}

impl From<api_types::user_playlists::Playlist> for PlaylistSummary {
    fn from(value: api_types::user_playlists::Playlist) -> Self {
        PlaylistSummary {
            id: value.id,
            name: value.name,
            total_tracks: value.tracks.total,
        }
    }
}

/// A provider-agnostic playlist entry with stable identity and the original
/// playlist ordering preserved in `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTrack {
    pub id: String,
    pub name: String,
    pub album: String,
    pub artists: Vec<String>,
    pub duration_secs: f64,
    pub position: usize,
}

/// Converts raw playlist entries into normalized tracks keyed by track ID.
///
/// `position` records the input index, artist order is preserved, and
/// durations convert from milliseconds to seconds. Entries without a stable
/// ID (local files) are skipped. Fails when the input has no tracks.
pub fn normalize_tracks(
    tracks: Vec<api_types::playlist_tracks::Track>,
) -> Result<HashMap<String, RemoteTrack>, Error> {
    if tracks.is_empty() {
        return Err(Error::EmptyPlaylist);
    }

    let mut normalized = HashMap::with_capacity(tracks.len());
    for (position, track) in tracks.into_iter().enumerate() {
        let Some(id) = track.id else {
            warn!("skipping track {:?}: no stable track ID", track.name);
            continue;
        };
        normalized.insert(
            id.clone(),
            RemoteTrack {
                id,
                name: track.name,
                album: track.album.name,
                artists: track.artists.into_iter().map(|artist| artist.name).collect(),
                duration_secs: track.duration_ms as f64 / 1000.0,
                position,
            },
        );
    }
    Ok(normalized)
}
