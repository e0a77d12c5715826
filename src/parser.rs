//! Single-pass parser for the compressed catalogue snapshot.
//!
//! The snapshot is a gzip stream of UTF-8 lines. Each line is a `B`
//! (band), `A` (album) or `T` (track) row with `|@|`-separated fields.
//! Parsing carries running context: the last band is the parent of the
//! albums after it, the last album the parent of the tracks after it,
//! and a per-album counter numbers the tracks from 1.
//!
//! A malformed line is skipped with a warning; only stream-level I/O
//! failures stop the pass.

use std::{
    io::{self, BufRead, BufReader, Lines, Read},
    path::PathBuf,
};

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::warn;

use docdex::util::Counter;

use crate::{
    error::SnapshotError,
    facet::FacetRegistry,
    genre,
    record::{AlbumContext, ArtistRecord, TrackRecord, YEAR_UNSPECIFIED},
};

/// Field separator used by snapshot rows.
pub const FIELD_DELIMITER: &str = "|@|";

/// Supplies the compressed snapshot byte stream. The collaborator that
/// fetches the snapshot (download, cache, fixture) lives behind this
/// seam.
pub trait SnapshotSource: Send + Sync {
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;
}

/// Reads the snapshot from a local file.
#[derive(Clone, Debug)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(std::fs::File::open(&self.path)?))
    }
}

/// A parsed record ready for document building.
#[derive(Clone, Debug)]
pub enum Record {
    Artist(ArtistRecord),
    Track(TrackRecord),
}

#[derive(Debug, Error)]
enum LineError {
    #[error("unknown row tag")]
    Tag,

    #[error("wrong field count for `{tag}` row: {found}")]
    Arity { tag: char, found: usize },

    #[error("empty identifier")]
    Identifier,

    #[error("unparsable year `{0}`")]
    Year(String),

    #[error("unparsable preferred flag `{0}`")]
    Flag(String),

    #[error("`{0}` row with no parent context")]
    Orphan(char),
}

/// Lazy iterator of typed records over one snapshot stream. Single
/// forward pass; not restartable.
pub struct SnapshotParser<R: Read> {
    lines: Lines<BufReader<GzDecoder<R>>>,
    band: Option<ArtistRecord>,
    album: Option<AlbumContext>,
    numbering: Counter<u32>,
    facets: FacetRegistry,
    line_no: usize,
    failed: Option<io::ErrorKind>,
}

impl<R: Read> SnapshotParser<R> {
    pub fn new(stream: R) -> Self {
        Self {
            lines: BufReader::new(GzDecoder::new(stream)).lines(),
            band: None,
            album: None,
            numbering: Counter::new(1),
            facets: FacetRegistry::new(),
            line_no: 0,
            failed: None,
        }
    }

    /// Consumes the parser, yielding the facet registry accumulated
    /// while parsing, or the stream failure that cut the pass short.
    pub fn finish(self) -> Result<FacetRegistry, SnapshotError> {
        match self.failed {
            Some(kind) => Err(SnapshotError::Stream(kind)),
            None => Ok(self.facets),
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<Option<Record>, LineError> {
        let mut fields = line.split(FIELD_DELIMITER);
        let tag = fields.next().unwrap_or_default();
        let rest: Vec<&str> = fields.collect();

        match tag {
            "B" => self.parse_band(&rest).map(|record| Some(Record::Artist(record))),
            "A" => self.parse_album(&rest).map(|_| None),
            "T" => self.parse_track(&rest).map(|record| Some(Record::Track(record))),
            _ => Err(LineError::Tag),
        }
    }

    /// `B|@|artistId|@|name|@|image|@|biography|@|members|@|genres`
    fn parse_band(&mut self, fields: &[&str]) -> Result<ArtistRecord, LineError> {
        let [artist_id, name, image, biography, members, raw_genres] = fields else {
            return Err(LineError::Arity {
                tag: 'B',
                found: fields.len(),
            });
        };
        let artist_id = non_empty(artist_id)?;

        let mut genres = Vec::new();
        for raw in raw_genres.split(',') {
            let cleaned = genre::clean(raw);
            if !genres.contains(&cleaned) {
                genres.push(cleaned);
            }
        }
        for cleaned in &genres {
            self.facets.add_genre(cleaned);
        }

        let record = ArtistRecord {
            artist_id,
            name: name.trim().to_string(),
            image: image.trim().to_string(),
            biography: biography.trim().to_string(),
            members: members.trim().to_string(),
            genres,
        };

        // A new band voids any album context from the previous one.
        self.band = Some(record.clone());
        self.album = None;
        Ok(record)
    }

    /// `A|@|albumId|@|name|@|image|@|year[|@|preferredTrack]`
    fn parse_album(&mut self, fields: &[&str]) -> Result<(), LineError> {
        if self.band.is_none() {
            return Err(LineError::Orphan('A'));
        }
        let (required, preferred) = match fields.len() {
            4 => (fields, None),
            5 => (&fields[..4], non_empty(fields[4]).ok()),
            found => return Err(LineError::Arity { tag: 'A', found }),
        };
        let [album_id, name, image, raw_year] = required else {
            unreachable!("arity checked above");
        };
        let album_id = non_empty(album_id)?;

        let year = match raw_year.trim() {
            "" => YEAR_UNSPECIFIED,
            raw => raw
                .parse::<u32>()
                .map_err(|_| LineError::Year(raw.to_string()))?,
        };
        self.facets.add_year(year);

        self.album = Some(AlbumContext {
            album_id,
            name: name.trim().to_string(),
            image: image.trim().to_string(),
            year,
            preferred_track: preferred,
        });
        self.numbering.reset(1);
        Ok(())
    }

    /// `T|@|trackId|@|name|@|location|@|isPreferred`
    fn parse_track(&mut self, fields: &[&str]) -> Result<TrackRecord, LineError> {
        let (Some(band), Some(album)) = (&self.band, &self.album) else {
            return Err(LineError::Orphan('T'));
        };
        let [track_id, name, location, raw_flag] = fields else {
            return Err(LineError::Arity {
                tag: 'T',
                found: fields.len(),
            });
        };
        let track_id = non_empty(track_id)?;

        let preferred_flag = match raw_flag.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            other => return Err(LineError::Flag(other.to_string())),
        };

        Ok(TrackRecord {
            artist_id: band.artist_id.clone(),
            artist_name: band.name.clone(),
            artist_image: band.image.clone(),
            genres: band.genres.clone(),
            album: album.clone(),
            track_id,
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            preferred_flag,
            number: self.numbering.next(),
        })
    }
}

impl<R: Read> Iterator for SnapshotParser<R> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.failed.is_some() {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(error) => {
                    self.failed = Some(error.kind());
                    return None;
                }
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            match self.parse_line(&line) {
                Ok(Some(record)) => return Some(record),
                Ok(None) => continue,
                Err(reason) => {
                    warn!(line = self.line_no, %reason, "skipping malformed snapshot line");
                    continue;
                }
            }
        }
    }
}

fn non_empty(field: &str) -> Result<String, LineError> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Err(LineError::Identifier);
    }
    Ok(trimmed.to_string())
}
