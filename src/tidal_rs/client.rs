use std::time::Duration;

use url::Url;

use crate::error::ApiError;
use crate::tidal_rs::types::{TidalPage, TidalPlaylist, TidalSession, TidalTrack};

pub const TIDAL_API_URL: &str = "https://api.tidal.com/v1/";

/// Playlists per listing request.
pub const PLAYLIST_PAGE_SIZE: u32 = 50;
/// Tracks per playlist-items request (API maximum).
pub const TRACK_PAGE_SIZE: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// TIDAL v1 API client
pub struct TidalClient {
    access_token: String,
    api_url: Url,
    client: reqwest::Client,
}

impl TidalClient {
    pub fn new(client: reqwest::Client, access_token: String) -> Result<Self, url::ParseError> {
        Ok(Self::with_api_url(
            client,
            access_token,
            Url::parse(TIDAL_API_URL)?,
        ))
    }

    pub fn with_api_url(client: reqwest::Client, access_token: String, api_url: Url) -> Self {
        Self {
            access_token,
            api_url,
            client,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
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

    /// The session behind the access token: user id and country code.
    pub async fn get_session(&self) -> Result<TidalSession, ApiError> {
        let url = self.api_url.join("sessions")?;
        self.get(url).await
    }

    pub fn user_playlists_url(
        &self,
        user_id: &str,
        country_code: &str,
        offset: u32,
    ) -> Result<Url, url::ParseError> {
        let mut url = self.api_url.join(&format!("users/{}/playlists", user_id))?;
        url.query_pairs_mut()
            .append_pair("countryCode", country_code)
            .append_pair("limit", &PLAYLIST_PAGE_SIZE.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }

    /// One page of the playlists in the user's collection, created and
    /// favourited alike.
    pub async fn get_user_playlists_page(
        &self,
        user_id: &str,
        country_code: &str,
        offset: u32,
    ) -> Result<TidalPage<TidalPlaylist>, ApiError> {
        let url = self.user_playlists_url(user_id, country_code, offset)?;
        self.get(url).await
    }

    pub fn playlist_tracks_url(
        &self,
        playlist_id: &str,
        country_code: &str,
        offset: u32,
    ) -> Result<Url, url::ParseError> {
        let mut url = self
            .api_url
            .join(&format!("playlists/{}/tracks", playlist_id))?;
        url.query_pairs_mut()
            .append_pair("countryCode", country_code)
            .append_pair("limit", &TRACK_PAGE_SIZE.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }

    /// Get all tracks in a playlist, in playlist order
    pub async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
        country_code: &str,
    ) -> Result<Vec<TidalTrack>, ApiError> {
        collect_offset_pages(|offset| async move {
            match self.playlist_tracks_url(playlist_id, country_code, offset) {
                Ok(url) => self.get(url).await,
                Err(e) => Err(ApiError::from(e)),
            }
        })
        .await
    }
}

/// Fetches pages starting at offset 0 until [`TidalPage::next_offset`] runs
/// out, concatenating the items in order.
async fn collect_offset_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<TidalPage<T>, ApiError>>,
{
    let mut all_items = Vec::new();
    let mut offset = Some(0);

    while let Some(current) = offset {
        let page = fetch_page(current).await?;
        offset = page.next_offset();
        all_items.extend(page.items);
    }

    Ok(all_items)
}
