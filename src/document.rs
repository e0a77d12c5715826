//! Domain entities, their stored index documents and the composite
//! sort-key encoding.
//!
//! Sort keys concatenate zero-padded 10-digit decimal components with
//! trimmed, lowercased text so that plain byte comparison at query
//! time reproduces the intended numeric and alphabetic orderings.

use serde::{Deserialize, Serialize};

use docdex::Indexable;

use crate::record::YEAR_UNSPECIFIED;

/// Fields of the artist index.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ArtistField {
    ArtistId,
}

/// Fields of the track index.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TrackField {
    TrackId,
    Genre,
    Year,
    SortDefault,
    SortArtist,
    SortAlbum,
    SortTrack,
}

/// An artist as returned to callers. Immutable once indexed.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub image: String,
    pub biography: String,
    pub members: String,
}

/// A track as returned to callers, hydrated from stored fields.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Track {
    pub artist_id: String,
    pub artist_name: String,
    pub artist_image: String,
    pub album_id: String,
    pub album_name: String,
    pub album_image: String,
    pub year: u32,
    pub track_id: String,
    pub name: String,
    pub number: u32,
    pub location: String,
    pub is_preferred: bool,
    pub genres: Vec<String>,
}

/// Stored form of an artist plus its derived keyword field.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ArtistDocument {
    pub artist: Artist,
    pub(crate) keywords: String,
}

/// Stored form of a track plus its derived keyword field and the four
/// precomputed sort keys.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TrackDocument {
    pub track: Track,
    pub(crate) keywords: String,
    pub(crate) sort_default: String,
    pub(crate) sort_artist: String,
    pub(crate) sort_album: String,
    pub(crate) sort_track: String,
}

impl Indexable for ArtistDocument {
    type Field = ArtistField;

    fn id(&self) -> &str {
        &self.artist.artist_id
    }

    fn keyword_text(&self) -> String {
        self.keywords.clone()
    }

    fn term_values(&self) -> Vec<(ArtistField, String)> {
        vec![(ArtistField::ArtistId, self.artist.artist_id.clone())]
    }

    fn sort_key(&self, _field: ArtistField) -> Option<&str> {
        None
    }
}

impl Indexable for TrackDocument {
    type Field = TrackField;

    fn id(&self) -> &str {
        &self.track.track_id
    }

    fn keyword_text(&self) -> String {
        self.keywords.clone()
    }

    fn term_values(&self) -> Vec<(TrackField, String)> {
        let mut values = Vec::with_capacity(self.track.genres.len() + 2);
        values.push((TrackField::TrackId, self.track.track_id.clone()));
        if self.track.year != YEAR_UNSPECIFIED {
            values.push((TrackField::Year, self.track.year.to_string()));
        }
        for genre in &self.track.genres {
            values.push((TrackField::Genre, genre.clone()));
        }
        values
    }

    fn sort_key(&self, field: TrackField) -> Option<&str> {
        match field {
            TrackField::SortDefault => Some(&self.sort_default),
            TrackField::SortArtist => Some(&self.sort_artist),
            TrackField::SortAlbum => Some(&self.sort_album),
            TrackField::SortTrack => Some(&self.sort_track),
            TrackField::TrackId | TrackField::Genre | TrackField::Year => None,
        }
    }
}

/// Widest integer a sort-key component can carry.
pub(crate) const SORT_COMPONENT_MAX: u64 = 9_999_999_999;

/// Zero-padded 10-digit rendering of one numeric component.
pub(crate) fn sort_component(value: u64) -> String {
    debug_assert!(value <= SORT_COMPONENT_MAX);
    format!("{value:010}")
}

/// Text component of a sort key.
pub(crate) fn sort_text(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{sort_component, sort_text};

    #[test]
    fn test_sort_component_orders_numerically() {
        assert!(sort_component(999) < sort_component(1005));
        assert!(sort_component(0) < sort_component(1));
        assert_eq!(sort_component(42).len(), 10);
    }

    #[test]
    fn test_sort_component_year_sentinel_sorts_last() {
        let sentinel = sort_component(u64::from(crate::record::YEAR_UNSPECIFIED));
        assert!(sort_component(2024) < sentinel);
        assert!(sort_component(9999) < sentinel);
    }

    #[test]
    fn test_sort_text_folds_case_and_whitespace() {
        assert_eq!(sort_text("  Dancing Queen "), "dancing queen");
    }
}
