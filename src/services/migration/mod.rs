pub mod copier;
pub mod enumerate;
pub mod filter;
pub mod matcher;

use std::sync::Arc;

use futures::TryStreamExt;

use crate::catalog::{ExclusionSet, Playlist};
use crate::error::CatalogError;
use crate::ports::catalog::{DestinationCatalog, SourceCatalog};

pub use copier::{CopiedPlaylist, MigrationReport, PlaylistCopier};
pub use enumerate::enumerate_playlists;
pub use filter::filter_already_migrated;
pub use matcher::{FirstCandidateMatcher, TrackMatcher};

#[derive(Debug, Clone, Default)]
pub struct MigrationOptions {
    pub exclusions: ExclusionSet,
    /// Copy playlists even when the destination already has one with the same name.
    pub include_migrated: bool,
}

/// The signed-in users on both services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sessions {
    pub source_user_id: String,
    pub destination_user_id: String,
}

/// Runs a migration from one service to another.
///
/// Owns the two catalog handles and wires the enumerator, the migration
/// filter and the copier together in a single sequential pass.
pub struct MigrationService<S, D, M = FirstCandidateMatcher<D>>
where
    S: SourceCatalog,
    D: DestinationCatalog,
    M: TrackMatcher,
{
    source: Arc<S>,
    destination: Arc<D>,
    copier: PlaylistCopier<S, D, M>,
}

impl<S, D> MigrationService<S, D>
where
    S: SourceCatalog,
    D: DestinationCatalog,
{
    /// Uses the first search candidate as the match for every track.
    pub fn new(source: S, destination: D) -> Self {
        let destination = Arc::new(destination);
        let matcher = FirstCandidateMatcher::new(destination.clone());
        Self::with_matcher(Arc::new(source), destination, matcher)
    }
}

impl<S, D, M> MigrationService<S, D, M>
where
    S: SourceCatalog,
    D: DestinationCatalog,
    M: TrackMatcher,
{
    pub fn with_matcher(source: Arc<S>, destination: Arc<D>, matcher: M) -> Self {
        let copier = PlaylistCopier::new(source.clone(), destination.clone(), matcher);
        Self {
            source,
            destination,
            copier,
        }
    }

    /// Establishes both sessions. The destination is checked first.
    pub async fn sign_in(&self) -> Result<Sessions, CatalogError> {
        let destination_user_id = self.destination.current_user_id().await?;
        tracing::info!(user_id = %destination_user_id, "Signed in to destination");

        let source_user_id = self.source.current_user_id().await?;
        tracing::info!(user_id = %source_user_id, "Signed in to source");

        Ok(Sessions {
            source_user_id,
            destination_user_id,
        })
    }

    /// The source playlists a migration would copy, in migration order.
    pub async fn plan(
        &self,
        sessions: &Sessions,
        options: &MigrationOptions,
    ) -> Result<Vec<Playlist>, CatalogError> {
        let candidates = enumerate_playlists(
            self.source.as_ref(),
            &sessions.source_user_id,
            &options.exclusions,
        );

        if options.include_migrated {
            candidates.try_collect().await
        } else {
            filter_already_migrated(
                self.destination.as_ref(),
                candidates,
                &sessions.destination_user_id,
            )
            .try_collect()
            .await
        }
    }

    /// Enumerates, filters and copies in one pass.
    pub async fn run(
        &self,
        sessions: &Sessions,
        options: &MigrationOptions,
    ) -> Result<MigrationReport, CatalogError> {
        let candidates = enumerate_playlists(
            self.source.as_ref(),
            &sessions.source_user_id,
            &options.exclusions,
        );

        let report = if options.include_migrated {
            self.copier
                .migrate(candidates, &sessions.destination_user_id)
                .await?
        } else {
            let remaining = filter_already_migrated(
                self.destination.as_ref(),
                candidates,
                &sessions.destination_user_id,
            );
            self.copier
                .migrate(remaining, &sessions.destination_user_id)
                .await?
        };

        tracing::info!(
            playlists = report.playlists.len(),
            attached = report.attached_tracks(),
            unmatched = report.unmatched_tracks(),
            "Migration finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Page, TrackRef};
    use crate::error::Service;
    use crate::ports::catalog::mocks::{MockDestination, MockSource};
    use crate::test_utils::{make_playlist, make_track};

    fn sessions() -> Sessions {
        Sessions {
            source_user_id: "alice".into(),
            destination_user_id: "me".into(),
        }
    }

    fn source_with_playlists(playlists: Vec<Playlist>) -> MockSource {
        let mut source = MockSource::new();
        source
            .expect_playlists_page()
            .returning(move |_, _| Ok(Page::last(playlists.clone())));
        source
            .expect_playlist_tracks()
            .returning(|playlist_id| {
                Ok(vec![make_track(
                    "Artist",
                    &format!("Song from {}", playlist_id),
                    &format!("tidal-{}", playlist_id),
                )])
            });
        source
    }

    #[tokio::test]
    async fn test_sign_in_returns_both_users() {
        let mut source = MockSource::new();
        source
            .expect_current_user_id()
            .returning(|| Ok("12345".into()));
        let mut destination = MockDestination::new();
        destination
            .expect_current_user_id()
            .returning(|| Ok("spotify-user".into()));

        let service = MigrationService::new(source, destination);
        let sessions = service.sign_in().await.unwrap();

        assert_eq!(sessions.source_user_id, "12345");
        assert_eq!(sessions.destination_user_id, "spotify-user");
    }

    #[tokio::test]
    async fn test_sign_in_failure_stops_before_source() {
        let mut source = MockSource::new();
        source.expect_current_user_id().never();
        let mut destination = MockDestination::new();
        destination
            .expect_current_user_id()
            .returning(|| Err(CatalogError::authentication(Service::Spotify, "invalid_grant")));

        let service = MigrationService::new(source, destination);
        let result = service.sign_in().await;

        assert!(result.unwrap_err().is_authentication());
    }

    #[tokio::test]
    async fn test_plan_skips_migrated_and_excluded() {
        let source = source_with_playlists(vec![
            make_playlist("a", "alice", "Road Trip"),
            make_playlist("b", "alice", "Workout"),
            make_playlist("c", "alice", "Secret"),
            make_playlist("d", "bob", "Followed"),
        ]);
        let mut destination = MockDestination::new();
        destination
            .expect_playlists_page()
            .returning(|_, _| Ok(Page::last(vec![make_playlist("x", "me", "Road Trip")])));

        let service = MigrationService::new(source, destination);
        let options = MigrationOptions {
            exclusions: ExclusionSet::from_entries(["tidal:playlist:c"]),
            include_migrated: false,
        };
        let planned = service.plan(&sessions(), &options).await.unwrap();

        let names: Vec<&str> = planned.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Workout"]);
    }

    #[tokio::test]
    async fn test_plan_with_include_migrated_does_not_read_destination() {
        let source = source_with_playlists(vec![make_playlist("a", "alice", "Road Trip")]);
        let mut destination = MockDestination::new();
        destination.expect_playlists_page().never();

        let service = MigrationService::new(source, destination);
        let options = MigrationOptions {
            include_migrated: true,
            ..Default::default()
        };
        let planned = service.plan(&sessions(), &options).await.unwrap();

        assert_eq!(planned.len(), 1);
    }

    #[tokio::test]
    async fn test_run_copies_remaining_playlists() {
        let source = source_with_playlists(vec![
            make_playlist("a", "alice", "Road Trip"),
            make_playlist("b", "alice", "Workout"),
        ]);
        let mut destination = MockDestination::new();
        destination
            .expect_playlists_page()
            .returning(|_, _| Ok(Page::last(vec![make_playlist("x", "me", "Road Trip")])));
        destination
            .expect_create_playlist()
            .withf(|owner_id, new_playlist| owner_id == "me" && new_playlist.name == "Workout")
            .times(1)
            .returning(|owner_id, new_playlist| {
                Ok(make_playlist("new-1", owner_id, &new_playlist.name))
            });
        destination
            .expect_search_tracks()
            .withf(|query| query == "artist:Artist track:Song from b")
            .returning(|_| Ok(vec![make_track("Artist", "Song from b", "spotify:track:b")]));
        destination
            .expect_add_tracks()
            .withf(|playlist_id, tracks| {
                playlist_id == "new-1" && tracks == [TrackRef::new("spotify:track:b")]
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = MigrationService::new(source, destination);
        let report = service
            .run(&sessions(), &MigrationOptions::default())
            .await
            .unwrap();

        assert_eq!(report.playlists.len(), 1);
        assert_eq!(report.playlists[0].name, "Workout");
        assert_eq!(report.attached_tracks(), 1);
    }

    #[tokio::test]
    async fn test_run_source_failure_aborts() {
        let mut source = MockSource::new();
        source.expect_playlists_page().returning(|_, _| {
            Err(CatalogError::transient(
                Service::Tidal,
                "list playlists",
                "connection reset",
            ))
        });
        let mut destination = MockDestination::new();
        destination
            .expect_playlists_page()
            .returning(|_, _| Ok(Page::last(Vec::new())));
        destination.expect_create_playlist().never();

        let service = MigrationService::new(source, destination);
        let result = service.run(&sessions(), &MigrationOptions::default()).await;

        assert!(matches!(result, Err(CatalogError::Transient { .. })));
    }
}
