use crate::catalog::{NewPlaylist, Page, PageToken, Playlist, Track, TrackRef};
use crate::error::CatalogError;

/// Paginated playlist listing, shared by both sides of a migration.
///
/// `page` is `None` for the first page; afterwards it is whatever the previous
/// page returned in `next`.
#[async_trait::async_trait]
pub trait PlaylistCatalog: Send + Sync {
    async fn playlists_page(
        &self,
        owner_id: &str,
        page: Option<PageToken>,
    ) -> Result<Page<Playlist>, CatalogError>;
}

/// Port for the service playlists are copied from.
///
/// Implementations live in `services::tidal::client` (production) or test mocks.
#[async_trait::async_trait]
pub trait SourceCatalog: PlaylistCatalog {
    /// Establishes the session and returns the id of the signed-in user.
    async fn current_user_id(&self) -> Result<String, CatalogError>;

    /// All tracks of a playlist, in playlist order.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, CatalogError>;
}

/// Port for the service playlists are copied to.
///
/// Implementations live in `services::spotify::client` (production) or test mocks.
#[async_trait::async_trait]
pub trait DestinationCatalog: PlaylistCatalog {
    /// Establishes the session and returns the id of the signed-in user.
    async fn current_user_id(&self) -> Result<String, CatalogError>;

    /// Candidates for a free-text query, best first as ranked by the service.
    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>, CatalogError>;

    async fn create_playlist(
        &self,
        owner_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<Playlist, CatalogError>;

    async fn add_tracks(&self, playlist_id: &str, tracks: &[TrackRef])
    -> Result<(), CatalogError>;
}
