//! Converts parsed records into index documents.
//!
//! Building is pure: the same record always yields the same document,
//! which is what makes rebuilding from the same snapshot idempotent.

use crate::{
    document::{
        sort_component, sort_text, Artist, ArtistDocument, Track, TrackDocument,
        SORT_COMPONENT_MAX,
    },
    error::IdentityError,
    record::{ArtistRecord, TrackRecord},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentBuilder;

impl DocumentBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_artist(&self, record: &ArtistRecord) -> ArtistDocument {
        let artist = Artist {
            artist_id: record.artist_id.clone(),
            name: record.name.clone(),
            image: record.image.clone(),
            biography: record.biography.clone(),
            members: record.members.clone(),
        };
        let keywords = artist.name.clone();

        ArtistDocument { artist, keywords }
    }

    /// Fails only when the album identifier cannot serve as a numeric
    /// sort component; the caller drops that record and continues.
    pub fn build_track(&self, record: &TrackRecord) -> Result<TrackDocument, IdentityError> {
        let album = &record.album;
        let album_num = album_sort_number(&album.album_id)?;

        let is_preferred = record.preferred_flag
            || matches_preferred(album.preferred_track.as_deref(), &record.name);

        let track = Track {
            artist_id: record.artist_id.clone(),
            artist_name: record.artist_name.clone(),
            artist_image: record.artist_image.clone(),
            album_id: album.album_id.clone(),
            album_name: album.name.clone(),
            album_image: album.image.clone(),
            year: album.year,
            track_id: record.track_id.clone(),
            name: record.name.clone(),
            number: record.number,
            location: record.location.clone(),
            is_preferred,
            genres: record.genres.clone(),
        };

        let keywords = format!("{} {} {}", track.artist_name, track.album_name, track.name);

        let year = sort_component(u64::from(track.year));
        let album_num = sort_component(album_num);
        let number = sort_component(u64::from(track.number));

        Ok(TrackDocument {
            sort_default: format!("{}{year}{album_num}{number}", sort_text(&track.artist_name)),
            sort_artist: format!("{year}{album_num}{number}"),
            sort_album: format!("{}{album_num}{number}", sort_text(&track.album_name)),
            sort_track: format!(
                "{}{}{number}",
                sort_text(&track.name),
                sort_text(&track.artist_name)
            ),
            keywords,
            track,
        })
    }
}

fn album_sort_number(album_id: &str) -> Result<u64, IdentityError> {
    album_id
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|&value| value <= SORT_COMPONENT_MAX)
        .ok_or_else(|| IdentityError::AlbumId(album_id.to_string()))
}

fn matches_preferred(preferred: Option<&str>, name: &str) -> bool {
    preferred.is_some_and(|preferred| preferred.trim().eq_ignore_ascii_case(name.trim()))
}
