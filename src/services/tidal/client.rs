use crate::catalog::{Page, PageToken, Playlist, Track};
use crate::config::TidalConfig;
use crate::error::{CatalogError, Service};
use crate::ports::catalog::{PlaylistCatalog, SourceCatalog};
use crate::tidal_rs::auth::refresh_access_token;
use crate::tidal_rs::client::TidalClient;
use crate::tidal_rs::types::{TidalPlaylist, TidalTrack};

/// TIDAL as the source of a migration.
pub struct TidalHttpAdapter {
    client: TidalClient,
    user_id: String,
    country_code: String,
}

impl TidalHttpAdapter {
    /// Refreshes the access token and opens a session.
    ///
    /// Every failure here is reported as an authentication error.
    pub async fn connect(http: reqwest::Client, config: &TidalConfig) -> Result<Self, CatalogError> {
        let token = refresh_access_token(
            &http,
            &config.client_id,
            config.client_secret.as_deref(),
            &config.refresh_token,
        )
        .await
        .map_err(|e| CatalogError::authentication(Service::Tidal, e))?;

        let client = TidalClient::new(http, token.access_token)
            .map_err(|e| CatalogError::authentication(Service::Tidal, e))?;
        let session = client
            .get_session()
            .await
            .map_err(|e| CatalogError::authentication(Service::Tidal, e))?;

        let country_code = config
            .country_code
            .clone()
            .unwrap_or(session.country_code);
        tracing::debug!(user_id = session.user_id, %country_code, "Opened TIDAL session");

        Ok(Self {
            client,
            user_id: session.user_id.to_string(),
            country_code,
        })
    }
}

fn to_playlist(playlist: TidalPlaylist) -> Playlist {
    Playlist {
        id: playlist.uuid,
        owner_id: playlist.creator.id.to_string(),
        name: playlist.title,
        description: playlist.description.unwrap_or_default(),
    }
}

fn to_track(track: TidalTrack) -> Track {
    Track {
        artist: track.primary_artist().unwrap_or_default().to_string(),
        title: track.title,
        service_ref: track.id.to_string(),
    }
}

fn parse_offset(token: Option<PageToken>) -> Result<u32, CatalogError> {
    match token {
        None => Ok(0),
        Some(token) => token
            .as_str()
            .parse()
            .map_err(|e| CatalogError::InvalidResponse {
                service: Service::Tidal,
                operation: "list playlists",
                reason: format!("bad page offset {:?}: {}", token.as_str(), e),
            }),
    }
}

#[async_trait::async_trait]
impl PlaylistCatalog for TidalHttpAdapter {
    async fn playlists_page(
        &self,
        owner_id: &str,
        page: Option<PageToken>,
    ) -> Result<Page<Playlist>, CatalogError> {
        let offset = parse_offset(page)?;
        let page = self
            .client
            .get_user_playlists_page(owner_id, &self.country_code, offset)
            .await
            .map_err(|e| CatalogError::from_api(Service::Tidal, "list playlists", e))?;

        let next = page
            .next_offset()
            .map(|offset| PageToken::new(offset.to_string()));
        Ok(Page {
            items: page.items.into_iter().map(to_playlist).collect(),
            next,
        })
    }
}

#[async_trait::async_trait]
impl SourceCatalog for TidalHttpAdapter {
    async fn current_user_id(&self) -> Result<String, CatalogError> {
        Ok(self.user_id.clone())
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, CatalogError> {
        let tracks = self
            .client
            .get_playlist_tracks(playlist_id, &self.country_code)
            .await
            .map_err(|e| CatalogError::from_api(Service::Tidal, "list playlist tracks", e))?;

        Ok(tracks.into_iter().map(to_track).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_playlist_uses_creator_as_owner() {
        let playlist: TidalPlaylist = serde_json::from_str(
            r#"{"uuid": "abc", "title": "Road Trip", "description": null, "creator": {"id": 42}}"#,
        )
        .unwrap();

        let playlist = to_playlist(playlist);
        assert_eq!(playlist.id, "abc");
        assert_eq!(playlist.owner_id, "42");
        assert_eq!(playlist.description, "");
    }

    #[test]
    fn test_to_track_uses_main_artist() {
        let track: TidalTrack = serde_json::from_str(
            r#"{
                "id": 77,
                "title": "Get Lucky",
                "version": "Radio Edit",
                "artist": {"id": 1, "name": "Daft Punk"},
                "artists": [{"id": 1, "name": "Daft Punk"}, {"id": 2, "name": "Pharrell Williams"}]
            }"#,
        )
        .unwrap();

        let track = to_track(track);
        assert_eq!(track.artist, "Daft Punk");
        assert_eq!(track.title, "Get Lucky");
        assert_eq!(track.service_ref, "77");
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset(None).unwrap(), 0);
        assert_eq!(parse_offset(Some(PageToken::new("150"))).unwrap(), 150);
        assert!(matches!(
            parse_offset(Some(PageToken::new("next"))),
            Err(CatalogError::InvalidResponse { .. })
        ));
    }
}
