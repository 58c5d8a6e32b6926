use serde::{Deserialize, Serialize};

/// TIDAL OAuth token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidalTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Response of `GET /sessions`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalSession {
    pub user_id: i64,
    pub country_code: String,
}

/// Offset based list envelope used by the v1 API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalPage<T> {
    pub offset: u32,
    pub total_number_of_items: u32,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> TidalPage<T> {
    /// Offset of the following page, `None` when this is the last one.
    pub fn next_offset(&self) -> Option<u32> {
        let next = self.offset + self.items.len() as u32;
        (!self.items.is_empty() && next < self.total_number_of_items).then_some(next)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidalPlaylist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creator: TidalCreator,
}

/// Playlist creator. Editorial playlists report id `0`.
#[derive(Debug, Clone, Deserialize)]
pub struct TidalCreator {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidalTrack {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub artist: Option<TidalArtist>,
    #[serde(default)]
    pub artists: Vec<TidalArtist>,
}

impl TidalTrack {
    /// The main artist, falling back to the first credited one.
    pub fn primary_artist(&self) -> Option<&str> {
        self.artist
            .as_ref()
            .or_else(|| self.artists.first())
            .map(|artist| artist.name.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidalArtist {
    pub name: String,
}
