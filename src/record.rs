//! Typed records produced by the snapshot parser.
//!
//! Records are transient: they exist between a parsed line and the
//! document builder, carrying the running parent context the flat
//! snapshot format implies.

/// Year value stored when the snapshot declares none. Its zero-padded
/// rendering sorts after every real year.
pub const YEAR_UNSPECIFIED: u32 = u32::MAX;

/// One `B` row: a band with its cleaned genre list.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRecord {
    pub artist_id: String,
    pub name: String,
    pub image: String,
    pub biography: String,
    pub members: String,
    /// Cleaned, deduplicated, never empty.
    pub genres: Vec<String>,
}

/// Running album context threaded from an `A` row to the `T` rows
/// beneath it.
#[derive(Clone, Debug, PartialEq)]
pub struct AlbumContext {
    pub album_id: String,
    pub name: String,
    pub image: String,
    /// [`YEAR_UNSPECIFIED`] when the year field was empty.
    pub year: u32,
    /// Declared preferred-track name, when the snapshot carries one.
    pub preferred_track: Option<String>,
}

/// One `T` row joined with its artist and album context.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRecord {
    pub artist_id: String,
    pub artist_name: String,
    pub artist_image: String,
    /// Band genres; tracks inherit them for filtering.
    pub genres: Vec<String>,
    pub album: AlbumContext,
    pub track_id: String,
    pub name: String,
    pub location: String,
    /// The row's own preferred flag, as written by the scraper.
    pub preferred_flag: bool,
    /// 1-based position within the album, assigned during parsing.
    pub number: u32,
}
