use serde::Deserialize;

#[derive(Deserialize)]
pub struct Root {
    pub(in crate::spotify) items: Vec<Playlist>,
}

#[derive(Deserialize)]
pub struct Playlist {
    pub(in crate::spotify) id: String,
    pub(in crate::spotify) name: String,
    pub(in crate::spotify) tracks: Tracks,
}

#[derive(Deserialize)]
pub struct Tracks {
    pub(in crate::spotify) total: u32,
}
