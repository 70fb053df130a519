use serde::Deserialize;

#[derive(Deserialize)]
pub struct Root {
    pub(in crate::spotify) access_token: String,
}
