use std::time::Duration;

use anyhow::Result;

use crate::spotify::{api_types, custom_types};

const API_BASE: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const PAGE_SIZE: u32 = 50;

/// Credentials and timeout for the Spotify Web API.
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            timeout: Duration::from_secs(5),
        }
    }
}

pub struct Client {
    client: reqwest::Client,
}

impl Client {
    /// Exchanges the client credentials for an app token and builds a client
    /// that sends it on every request.
    pub async fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let token: api_types::token::Root = http
            .post(TOKEN_URL)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Self::with_bearer(&token.access_token, config.timeout)
    }

    /// Builds a client around an existing OAuth bearer token, for endpoints
    /// that need user scopes.
    pub fn with_bearer(token: &str, timeout: Duration) -> Result<Self> {
        let headers = {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("Authorization", format!("Bearer {token}").try_into()?);
            headers
        };
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// `None` when the playlist ID does not resolve to any playlist.
    pub async fn get_playlist(&self, id: &str) -> Result<Option<custom_types::Playlist>> {
        let response = self
            .client
            .get(format!(
                "{API_BASE}/playlists/{id}?fields=id,name,images,tracks(total)",
            ))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let root: api_types::playlist::Root = response.error_for_status()?.json().await?;
        Ok(Some(root.into()))
    }

    /// One page of playlist entries.
    pub async fn get_playlist_tracks(
        &self,
        id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<api_types::playlist_tracks::Root> {
        Ok(self
            .client
            .get(format!(
                "{API_BASE}/playlists/{id}/tracks?fields=items(track(id,name,album.name,artists(name),duration_ms))&limit={limit}&offset={offset}",
            ))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    /// Pages through the whole playlist, dropping unavailable entries.
    pub async fn get_all_playlist_tracks(
        &self,
        id: &str,
    ) -> Result<Vec<api_types::playlist_tracks::Track>> {
        let mut tracks = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.get_playlist_tracks(id, PAGE_SIZE, offset).await?;
            let page_len = page.items.len();
            if page_len == 0 {
                break;
            }
            tracks.extend(page.items.into_iter().filter_map(|item| item.track));
            if page_len < PAGE_SIZE as usize {
                break;
            }
            offset += page_len as u32;
        }
        Ok(tracks)
    }

    /// One page of the authenticated user's playlists.
    pub async fn my_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<custom_types::PlaylistSummary>> {
        let root: api_types::user_playlists::Root = self
            .client
            .get(format!("{API_BASE}/me/playlists?limit={limit}&offset={offset}"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(root.items.into_iter().map(Into::into).collect())
    }
}
