use std::sync::Arc;

use crate::catalog::{Track, TrackRef};
use crate::error::CatalogError;
use crate::ports::catalog::DestinationCatalog;

/// Maps a source track to a destination track reference.
///
/// `Ok(None)` means nothing matched; it is not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrackMatcher: Send + Sync {
    async fn resolve(&self, track: &Track) -> Result<Option<TrackRef>, CatalogError>;
}

/// Builds the fielded search query for a track.
///
/// Artist and title are inserted verbatim. Characters with meaning in the
/// destination's query syntax are not escaped, so they can widen or narrow the
/// search.
pub fn search_query(track: &Track) -> String {
    format!("artist:{} track:{}", track.artist, track.title)
}

/// Takes the first candidate the destination search returns.
///
/// No score threshold and no similarity check between the source metadata and
/// the candidate.
pub struct FirstCandidateMatcher<D: DestinationCatalog> {
    destination: Arc<D>,
}

impl<D: DestinationCatalog> FirstCandidateMatcher<D> {
    pub fn new(destination: Arc<D>) -> Self {
        Self { destination }
    }
}

#[async_trait::async_trait]
impl<D: DestinationCatalog> TrackMatcher for FirstCandidateMatcher<D> {
    async fn resolve(&self, track: &Track) -> Result<Option<TrackRef>, CatalogError> {
        let query = search_query(track);
        let candidates = self.destination.search_tracks(&query).await?;
        tracing::debug!(%query, candidates = candidates.len(), "Searched destination");

        Ok(candidates.into_iter().next().map(TrackRef::from))
    }
}
