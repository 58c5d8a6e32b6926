use crate::catalog::{Page, PageToken, Playlist, Track};

pub fn make_playlist(id: &str, owner_id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
    }
}

pub fn make_track(artist: &str, title: &str, service_ref: &str) -> Track {
    Track {
        artist: artist.to_string(),
        title: title.to_string(),
        service_ref: service_ref.to_string(),
    }
}

/// `page_count` pages of `page_size` playlists owned by `owner_id`.
///
/// Playlist ids are `playlist-<n>` numbered across pages. Each page's `next`
/// token is the index of the following page; the last page has none.
pub fn paged_playlists(owner_id: &str, page_count: usize, page_size: usize) -> Vec<Page<Playlist>> {
    (0..page_count)
        .map(|page| {
            let items = (0..page_size)
                .map(|i| {
                    let n = page * page_size + i;
                    make_playlist(&format!("playlist-{}", n), owner_id, &format!("Playlist {}", n))
                })
                .collect();
            let next = (page + 1 < page_count).then(|| PageToken::new((page + 1).to_string()));
            Page { items, next }
        })
        .collect()
}
