use crate::catalog::{NewPlaylist, Page, PageToken, Playlist, Track, TrackRef};
use crate::config::SpotifyConfig;
use crate::error::{CatalogError, Service};
use crate::ports::catalog::{DestinationCatalog, PlaylistCatalog};
use crate::spotify_rs::auth::refresh_access_token;
use crate::spotify_rs::client::SpotifyClient;
use crate::spotify_rs::types::{
    CreatePlaylistRequest, SpotifyPaging, SpotifyPlaylist, SpotifyTrack,
};

/// Scopes the refresh token must have been granted.
pub const SPOTIFY_SCOPES: [&str; 3] = [
    "playlist-read-private",
    "playlist-modify-private",
    "playlist-modify-public",
];

/// Spotify as the destination of a migration.
pub struct SpotifyHttpAdapter {
    client: SpotifyClient,
    user_id: String,
}

impl SpotifyHttpAdapter {
    /// Refreshes the access token and looks up the signed-in user.
    ///
    /// Every failure here is reported as an authentication error.
    pub async fn connect(
        http: reqwest::Client,
        config: &SpotifyConfig,
    ) -> Result<Self, CatalogError> {
        let token = refresh_access_token(
            &http,
            &config.client_id,
            &config.client_secret,
            &config.refresh_token,
        )
        .await
        .map_err(|e| CatalogError::authentication(Service::Spotify, e))?;

        let client = SpotifyClient::new(http, token.access_token)
            .map_err(|e| CatalogError::authentication(Service::Spotify, e))?;
        let user = client
            .get_current_user()
            .await
            .map_err(|e| CatalogError::authentication(Service::Spotify, e))?;
        tracing::debug!(user_id = %user.id, display_name = ?user.display_name, "Signed in to Spotify");

        Ok(Self {
            client,
            user_id: user.id,
        })
    }
}

fn to_playlist(playlist: SpotifyPlaylist) -> Playlist {
    Playlist {
        id: playlist.id,
        owner_id: playlist.owner.id,
        name: playlist.name,
        description: playlist.description.unwrap_or_default(),
    }
}

fn to_track(track: SpotifyTrack) -> Track {
    Track {
        artist: track
            .artists
            .into_iter()
            .next()
            .map(|artist| artist.name)
            .unwrap_or_default(),
        title: track.name,
        service_ref: track.uri,
    }
}

/// The `next` link becomes the page token, handed back verbatim.
fn to_page(paging: SpotifyPaging<SpotifyPlaylist>) -> Page<Playlist> {
    let next = paging.next.clone().map(PageToken::new);
    Page {
        items: paging.into_items().into_iter().map(to_playlist).collect(),
        next,
    }
}

#[async_trait::async_trait]
impl PlaylistCatalog for SpotifyHttpAdapter {
    async fn playlists_page(
        &self,
        owner_id: &str,
        page: Option<PageToken>,
    ) -> Result<Page<Playlist>, CatalogError> {
        let page = self
            .client
            .get_user_playlists_page(owner_id, page.as_ref().map(PageToken::as_str))
            .await
            .map_err(|e| CatalogError::from_api(Service::Spotify, "list playlists", e))?;

        Ok(to_page(page))
    }
}

#[async_trait::async_trait]
impl DestinationCatalog for SpotifyHttpAdapter {
    async fn current_user_id(&self) -> Result<String, CatalogError> {
        Ok(self.user_id.clone())
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>, CatalogError> {
        let tracks = self
            .client
            .search_tracks(query)
            .await
            .map_err(|e| CatalogError::from_api(Service::Spotify, "search tracks", e))?;

        Ok(tracks.into_iter().map(to_track).collect())
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<Playlist, CatalogError> {
        let request = CreatePlaylistRequest {
            name: &playlist.name,
            description: &playlist.description,
            public: playlist.public,
        };
        let created = self
            .client
            .create_playlist(owner_id, &request)
            .await
            .map_err(|e| CatalogError::from_api(Service::Spotify, "create playlist", e))?;

        Ok(to_playlist(created))
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        tracks: &[TrackRef],
    ) -> Result<(), CatalogError> {
        let uris: Vec<String> = tracks.iter().map(|t| t.as_str().to_string()).collect();
        self.client
            .add_tracks(playlist_id, &uris)
            .await
            .map_err(|e| CatalogError::from_api(Service::Spotify, "add tracks", e))
    }
}
