use async_stream::try_stream;
use futures::future;
use futures::{Stream, TryStreamExt};

use crate::catalog::{ExclusionSet, MigratedNameSet, Playlist};
use crate::error::CatalogError;
use crate::ports::catalog::PlaylistCatalog;

use super::enumerate::enumerate_playlists;

/// Names of every playlist `owner_id` already owns on the destination.
///
/// No exclusion set applies on this side: everything already there counts.
pub async fn migrated_names<C>(
    destination: &C,
    owner_id: &str,
) -> Result<MigratedNameSet, CatalogError>
where
    C: PlaylistCatalog + ?Sized,
{
    let no_exclusions = ExclusionSet::default();
    let names: MigratedNameSet = enumerate_playlists(destination, owner_id, &no_exclusions)
        .map_ok(|playlist| playlist.name)
        .try_collect()
        .await?;

    tracing::debug!(
        owner_id,
        count = names.len(),
        "Collected destination playlist names"
    );
    Ok(names)
}

/// Drops candidates whose name already exists on the destination.
///
/// Names are compared verbatim. A renamed playlist is migrated again, and two
/// source playlists sharing a name with one destination playlist are both
/// skipped.
pub fn without_migrated<'a, S>(
    candidates: S,
    migrated: MigratedNameSet,
) -> impl Stream<Item = Result<Playlist, CatalogError>> + Send + 'a
where
    S: Stream<Item = Result<Playlist, CatalogError>> + Send + 'a,
{
    candidates.try_filter(move |playlist| {
        let keep = !migrated.contains(&playlist.name);
        if !keep {
            tracing::info!(playlist = %playlist.name, "Skipping playlist already on destination");
        }
        future::ready(keep)
    })
}

/// Drops candidates that already exist on the destination.
///
/// The destination is read once, when the returned stream is first polled.
pub fn filter_already_migrated<'a, C, S>(
    destination: &'a C,
    candidates: S,
    destination_owner_id: &'a str,
) -> impl Stream<Item = Result<Playlist, CatalogError>> + Send + 'a
where
    C: PlaylistCatalog + ?Sized,
    S: Stream<Item = Result<Playlist, CatalogError>> + Send + 'a,
{
    try_stream! {
        let migrated = migrated_names(destination, destination_owner_id).await?;
        let remaining = without_migrated(candidates, migrated);
        futures::pin_mut!(remaining);
        while let Some(playlist) = remaining.try_next().await? {
            yield playlist;
        }
    }
}
