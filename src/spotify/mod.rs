mod api_types;
mod client;
pub mod custom_types;

pub use client::{Client, Config};

/// Spotify IDs are 22 base62 characters.
pub fn validate_playlist_id(id: &str) -> bool {
    id.len() == 22 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_playlist_id() {
        assert!(validate_playlist_id("37i9dQZF1DXcBWIGoYBM5M"));
    }

    #[test]
    fn test_validate_playlist_id_wrong_length() {
        assert!(!validate_playlist_id("37i9dQZF1DX"));
        assert!(!validate_playlist_id(""));
    }

    #[test]
    fn test_validate_playlist_id_symbols() {
        assert!(!validate_playlist_id("37i9dQZF1DXcBWIGoYBM5-"));
    }
}
