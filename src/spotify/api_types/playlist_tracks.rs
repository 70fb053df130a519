use serde::Deserialize;

#[derive(Deserialize)]
pub struct Root {
    pub(in crate::spotify) items: Vec<Item>,
}

#[derive(Deserialize)]
pub struct Item {
    /// `null` for removed or otherwise unavailable entries
    pub(in crate::spotify) track: Option<Track>,
}

#[derive(Deserialize)]
pub struct Track {
    /// `null` for local files in the playlist
    pub(in crate::spotify) id: Option<String>,
    pub(in crate::spotify) name: String,
    pub(in crate::spotify) album: Album,
    pub(in crate::spotify) artists: Vec<Artist>,
    pub(in crate::spotify) duration_ms: u64,
}

#[derive(Deserialize)]
pub struct Album {
    pub(in crate::spotify) name: String,
}

#[derive(Deserialize)]
pub struct Artist {
    pub(in crate::spotify) name: String,
}
