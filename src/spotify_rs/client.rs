use std::time::Duration;

use url::Url;

use crate::error::ApiError;
use crate::spotify_rs::types::{
    AddTracksRequest, CreatePlaylistRequest, SpotifyPaging, SpotifyPlaylist,
    SpotifySearchResponse, SpotifyTrack, SpotifyUser,
};

pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1/";

/// Playlists per listing request (API maximum).
pub const PLAYLIST_PAGE_SIZE: u32 = 50;
/// Candidates requested per search.
pub const SEARCH_LIMIT: u32 = 10;
/// URIs per add-items request (API maximum).
pub const ADD_TRACKS_CHUNK: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Spotify Web API client
pub struct SpotifyClient {
    access_token: String,
    api_url: Url,
    client: reqwest::Client,
}

impl SpotifyClient {
    pub fn new(client: reqwest::Client, access_token: String) -> Result<Self, url::ParseError> {
        Ok(Self::with_api_url(
            client,
            access_token,
            Url::parse(SPOTIFY_API_URL)?,
        ))
    }

    pub fn with_api_url(client: reqwest::Client, access_token: String, api_url: Url) -> Self {
        Self {
            access_token,
            api_url,
            client,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_url.join(path)
    }

    /// Get the current user's profile
    pub async fn get_current_user(&self) -> Result<SpotifyUser, ApiError> {
        let url = self.endpoint("me")?;
        self.client
            .get(url)
            .bearer_auth(&self.access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(ApiError::from)
    }

    /// URL of the first playlist page for `user_id`.
    pub fn user_playlists_url(&self, user_id: &str) -> Result<Url, url::ParseError> {
        let mut url = self.endpoint(&format!("users/{}/playlists", user_id))?;
        url.query_pairs_mut()
            .append_pair("limit", &PLAYLIST_PAGE_SIZE.to_string());
        Ok(url)
    }

    /// Fetch one page of the user's playlists. `page_url` is the `next` link
    /// of the previous page, or `None` for the first page.
    pub async fn get_user_playlists_page(
        &self,
        user_id: &str,
        page_url: Option<&str>,
    ) -> Result<SpotifyPaging<SpotifyPlaylist>, ApiError> {
        let url = match page_url {
            Some(next) => Url::parse(next),
            None => self.user_playlists_url(user_id),
        }?;

        self.client
            .get(url)
            .bearer_auth(&self.access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(ApiError::from)
    }

    pub fn search_url(&self, query: &str) -> Result<Url, url::ParseError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("type", "track")
            .append_pair("limit", &SEARCH_LIMIT.to_string());
        Ok(url)
    }

    /// Search tracks. The order of the returned tracks is Spotify's ranking.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<SpotifyTrack>, ApiError> {
        let url = self.search_url(query)?;

        let response: SpotifySearchResponse = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.tracks.into_items())
    }

    pub async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest<'_>,
    ) -> Result<SpotifyPlaylist, ApiError> {
        let url = self.endpoint(&format!("users/{}/playlists", user_id))?;

        self.client
            .post(url)
            .bearer_auth(&self.access_token)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(ApiError::from)
    }

    /// Append tracks to a playlist, in order, splitting into requests of at most
    /// [`ADD_TRACKS_CHUNK`] URIs. A failing chunk stops the remaining ones.
    pub async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("playlists/{}/tracks", playlist_id))?;

        for request in add_tracks_requests(uris) {
            self.client
                .post(url.clone())
                .bearer_auth(&self.access_token)
                .timeout(REQUEST_TIMEOUT)
                .json(&request)
                .send()
                .await?
                .error_for_status()?;
            tracing::debug!(playlist_id, count = request.uris.len(), "Added tracks chunk");
        }

        Ok(())
    }
}

/// Request bodies for appending `uris`, in order, at most [`ADD_TRACKS_CHUNK`]
/// URIs each.
fn add_tracks_requests(uris: &[String]) -> Vec<AddTracksRequest<'_>> {
    uris.chunks(ADD_TRACKS_CHUNK)
        .map(|uris| AddTracksRequest { uris })
        .collect()
}
