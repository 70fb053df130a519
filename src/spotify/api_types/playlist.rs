use serde::Deserialize;

#[derive(Deserialize)]
pub struct Root {
    pub(in crate::spotify) id: String,
    pub(in crate::spotify) name: String,
    #[serde(default)]
    pub(in crate::spotify) images: Vec<Image>,
    pub(in crate::spotify) tracks: Tracks,
}

#[derive(Deserialize)]
pub struct Image {
    pub(in crate::spotify) url: String,
}

#[derive(Deserialize)]
pub struct Tracks {
    pub(in crate::spotify) total: u32,
}
