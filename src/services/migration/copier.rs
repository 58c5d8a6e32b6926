use std::sync::Arc;

use futures::{Stream, TryStreamExt};

use crate::catalog::{NewPlaylist, Playlist, Track};
use crate::error::CatalogError;
use crate::ports::catalog::{DestinationCatalog, SourceCatalog};

use super::matcher::TrackMatcher;

/// Outcome of copying one playlist.
#[derive(Debug, Clone)]
pub struct CopiedPlaylist {
    pub source_id: String,
    pub name: String,
    pub destination_id: String,
    pub attached: usize,
    pub unmatched: Vec<Track>,
}

/// Outcome of a whole run, in migration order.
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub playlists: Vec<CopiedPlaylist>,
}

impl MigrationReport {
    pub fn attached_tracks(&self) -> usize {
        self.playlists.iter().map(|p| p.attached).sum()
    }

    pub fn unmatched_tracks(&self) -> usize {
        self.playlists.iter().map(|p| p.unmatched.len()).sum()
    }
}

/// Recreates source playlists on the destination.
pub struct PlaylistCopier<S, D, M>
where
    S: SourceCatalog,
    D: DestinationCatalog,
    M: TrackMatcher,
{
    source: Arc<S>,
    destination: Arc<D>,
    matcher: M,
}

impl<S, D, M> PlaylistCopier<S, D, M>
where
    S: SourceCatalog,
    D: DestinationCatalog,
    M: TrackMatcher,
{
    pub fn new(source: Arc<S>, destination: Arc<D>, matcher: M) -> Self {
        Self {
            source,
            destination,
            matcher,
        }
    }

    /// Creates a private destination playlist and attaches every track that
    /// resolves, in source order.
    ///
    /// Creation is not idempotent: copying the same playlist twice yields two
    /// destination playlists. Tracks without a match are left out. The
    /// destination playlist is kept even if attaching tracks fails afterwards.
    pub async fn copy_playlist(
        &self,
        playlist: &Playlist,
        destination_owner_id: &str,
    ) -> Result<CopiedPlaylist, CatalogError> {
        let created = self
            .destination
            .create_playlist(destination_owner_id, &NewPlaylist::private_copy_of(playlist))
            .await?;
        tracing::info!(
            playlist = %playlist.name,
            destination_id = %created.id,
            "Created destination playlist"
        );

        let tracks = self.source.playlist_tracks(&playlist.id).await?;

        let mut resolved = Vec::with_capacity(tracks.len());
        let mut unmatched = Vec::new();
        for track in tracks {
            match self.matcher.resolve(&track).await? {
                Some(track_ref) => resolved.push(track_ref),
                None => {
                    tracing::info!(
                        playlist = %playlist.name,
                        artist = %track.artist,
                        title = %track.title,
                        "No match on destination, skipping track"
                    );
                    unmatched.push(track);
                }
            }
        }

        // Nothing to attach; the playlist stays empty.
        if !resolved.is_empty() {
            self.destination.add_tracks(&created.id, &resolved).await?;
        }

        tracing::info!(
            playlist = %playlist.name,
            attached = resolved.len(),
            unmatched = unmatched.len(),
            "Copied playlist"
        );

        Ok(CopiedPlaylist {
            source_id: playlist.id.clone(),
            name: playlist.name.clone(),
            destination_id: created.id,
            attached: resolved.len(),
            unmatched,
        })
    }

    /// Copies each playlist in stream order, one at a time.
    ///
    /// The first failure aborts the run; playlists copied before it stay on the
    /// destination.
    pub async fn migrate<P>(
        &self,
        playlists: P,
        destination_owner_id: &str,
    ) -> Result<MigrationReport, CatalogError>
    where
        P: Stream<Item = Result<Playlist, CatalogError>>,
    {
        futures::pin_mut!(playlists);

        let mut report = MigrationReport::default();
        while let Some(playlist) = playlists.try_next().await? {
            let copied = self.copy_playlist(&playlist, destination_owner_id).await?;
            report.playlists.push(copied);
        }

        Ok(report)
    }
}
