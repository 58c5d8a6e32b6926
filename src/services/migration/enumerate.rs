use async_stream::try_stream;
use futures::Stream;

use crate::catalog::{ExclusionSet, PageToken, Playlist};
use crate::error::CatalogError;
use crate::ports::catalog::PlaylistCatalog;

/// Lazily walks every playlist page of `owner_id` on `catalog`.
///
/// Only playlists owned by `owner_id` and absent from `exclusions` are
/// yielded; followed playlists are dropped. Pages are fetched as the stream is
/// polled and the walk stops on the first page without a `next` token. The
/// stream is not restartable, call this again to start over.
pub fn enumerate_playlists<'a, C>(
    catalog: &'a C,
    owner_id: &'a str,
    exclusions: &'a ExclusionSet,
) -> impl Stream<Item = Result<Playlist, CatalogError>> + Send + 'a
where
    C: PlaylistCatalog + ?Sized,
{
    try_stream! {
        let mut token: Option<PageToken> = None;
        let mut page_number = 0usize;

        loop {
            page_number += 1;
            let page = catalog.playlists_page(owner_id, token.take()).await?;
            tracing::debug!(
                owner_id,
                page_number,
                items = page.items.len(),
                has_next = page.next.is_some(),
                "Fetched playlist page"
            );

            for playlist in page.items {
                if playlist.owner_id != owner_id {
                    tracing::trace!(playlist = %playlist.name, "Skipping playlist owned by someone else");
                    continue;
                }
                if exclusions.contains(&playlist.id) {
                    tracing::debug!(playlist = %playlist.name, id = %playlist.id, "Skipping excluded playlist");
                    continue;
                }
                yield playlist;
            }

            match page.next {
                Some(next) => token = Some(next),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Page;
    use crate::ports::catalog::mocks::MockSource;
    use crate::test_utils::{make_playlist, paged_playlists};
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_skips_playlists_owned_by_others() {
        let mut catalog = MockSource::new();
        catalog.expect_playlists_page().returning(|_, _| {
            Ok(Page::last(vec![
                make_playlist("p1", "alice", "Mine"),
                make_playlist("p2", "bob", "Followed"),
            ]))
        });

        let exclusions = ExclusionSet::default();
        let playlists: Vec<Playlist> = enumerate_playlists(&catalog, "alice", &exclusions)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].id, "p1");
    }

    #[tokio::test]
    async fn test_skips_excluded_playlists() {
        let mut catalog = MockSource::new();
        catalog.expect_playlists_page().returning(|_, _| {
            Ok(Page::last(vec![
                make_playlist("37i9dQZF1", "alice", "Excluded"),
                make_playlist("keep", "alice", "Kept"),
            ]))
        });

        let exclusions = ExclusionSet::from_entries(["spotify:playlist:37i9dQZF1"]);
        let playlists: Vec<Playlist> = enumerate_playlists(&catalog, "alice", &exclusions)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(
            playlists.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec!["keep"]
        );
    }

    #[tokio::test]
    async fn test_walks_every_page_in_order() {
        let mut catalog = MockSource::new();
        let pages = paged_playlists("alice", 3, 50);
        catalog
            .expect_playlists_page()
            .times(3)
            .returning(move |_, token| {
                let index = token
                    .map(|t| t.as_str().parse::<usize>().unwrap())
                    .unwrap_or(0);
                Ok(pages[index].clone())
            });

        let exclusions = ExclusionSet::default();
        let playlists: Vec<Playlist> = enumerate_playlists(&catalog, "alice", &exclusions)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(playlists.len(), 150);
        let expected: Vec<String> = (0..150).map(|i| format!("playlist-{}", i)).collect();
        let actual: Vec<String> = playlists.into_iter().map(|p| p.id).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_requests_pages_for_owner() {
        let mut catalog = MockSource::new();
        catalog
            .expect_playlists_page()
            .withf(|owner_id, token| owner_id == "alice" && token.is_none())
            .times(1)
            .returning(|_, _| Ok(Page::last(Vec::new())));

        let exclusions = ExclusionSet::default();
        let playlists: Vec<Playlist> = enumerate_playlists(&catalog, "alice", &exclusions)
            .try_collect()
            .await
            .unwrap();

        assert!(playlists.is_empty());
    }

    #[tokio::test]
    async fn test_is_lazy() {
        let mut catalog = MockSource::new();
        let pages = paged_playlists("alice", 3, 2);
        // Only the first page may be requested when one item is taken.
        catalog
            .expect_playlists_page()
            .times(1)
            .returning(move |_, _| Ok(pages[0].clone()));

        let exclusions = ExclusionSet::default();
        let stream = enumerate_playlists(&catalog, "alice", &exclusions);
        futures::pin_mut!(stream);
        let first = stream.try_next().await.unwrap().unwrap();

        assert_eq!(first.id, "playlist-0");
    }

    #[tokio::test]
    async fn test_propagates_catalog_errors() {
        let mut catalog = MockSource::new();
        let pages = paged_playlists("alice", 2, 1);
        catalog
            .expect_playlists_page()
            .returning(move |_, token| match token {
                None => Ok(pages[0].clone()),
                Some(_) => Err(CatalogError::transient(
                    crate::error::Service::Tidal,
                    "list playlists",
                    "connection reset",
                )),
            });

        let exclusions = ExclusionSet::default();
        let result: Result<Vec<Playlist>, CatalogError> =
            enumerate_playlists(&catalog, "alice", &exclusions)
                .try_collect()
                .await;

        assert!(matches!(result, Err(CatalogError::Transient { .. })));
    }
}
