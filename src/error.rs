use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no playlist found for ID {0}")]
    PlaylistNotFound(String),

    #[error("no tracks found in playlist")]
    EmptyPlaylist,

    #[error("at least one track required")]
    EmptyTracklist,

    #[error("option {0:?} is not valid")]
    InvalidChoice(String),

    #[error("failed to download image: HTTP {0}")]
    Download(reqwest::StatusCode),
}
