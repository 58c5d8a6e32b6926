use std::collections::HashSet;

/// A playlist as reported by one streaming service.
///
/// `id` is only meaningful on the service that produced it. `name` is the only
/// key that can be compared across services. Tracks are not carried inline,
/// they are fetched lazily through the source port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
}

/// A track as reported by one streaming service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub artist: String,
    pub title: String,
    /// The service-scoped identifier (TIDAL track id, Spotify track URI).
    pub service_ref: String,
}

/// Destination-scoped pointer used to attach a track to a destination playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRef(String);

impl TrackRef {
    #[cfg(test)]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Track> for TrackRef {
    fn from(track: Track) -> Self {
        Self(track.service_ref)
    }
}

/// Opaque continuation handed back by a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a paginated listing. `next` is `None` on the last page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageToken>,
}

#[cfg(test)]
impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Attributes of a playlist to be created on the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub public: bool,
}

impl NewPlaylist {
    /// A private copy of `source`.
    pub fn private_copy_of(source: &Playlist) -> Self {
        Self {
            name: source.name.clone(),
            description: source.description.clone(),
            public: false,
        }
    }
}

/// Source playlist ids that are never enumerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(HashSet<String>);

impl ExclusionSet {
    /// Builds the set from configured entries, keeping only the segment after
    /// the final `:` of each entry (`tidal:playlist:abc` becomes `abc`).
    /// Entries with nothing after the final `:` are ignored.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .filter_map(|entry| {
                    entry
                        .as_ref()
                        .rsplit(':')
                        .next()
                        .map(str::to_string)
                })
                .filter(|id| !id.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, playlist_id: &str) -> bool {
        self.0.contains(playlist_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Names of the playlists already present on the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigratedNameSet(HashSet<String>);

impl MigratedNameSet {
    /// Exact match, no case or whitespace folding.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<String> for MigratedNameSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<String> for MigratedNameSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}
