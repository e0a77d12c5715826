//! On-disk representation of one committed index generation.
//!
//! A segment is a single `segment.jsonl` file: a JSON header line
//! carrying the format version, document count and an XXH3-64 checksum
//! of the payload, followed by one JSON document per line. Commits
//! write a sibling temp file and rename it over the live one, so a
//! crash mid-commit leaves the previous generation intact.

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, ErrorKind, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    document::Indexable,
    error::{Error, SegmentError},
    hash,
};

pub const SEGMENT_FILE: &str = "segment.jsonl";
const SEGMENT_TMP_FILE: &str = "segment.jsonl.tmp";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Deserialize, Serialize)]
struct Header {
    version: u32,
    count: usize,
    checksum: String,
}

/// Atomically replaces the committed segment under `dir` with `docs`.
pub fn write<D: Indexable>(dir: &Path, docs: &[D]) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|error| Error::io(dir, &error))?;

    let mut payload = Vec::new();
    for doc in docs {
        serde_json::to_writer(&mut payload, doc)
            .map_err(|error| Error::Serialization(error.to_string()))?;
        payload.push(b'\n');
    }

    let header = Header {
        version: FORMAT_VERSION,
        count: docs.len(),
        checksum: hash::digest_hex(&payload),
    };

    let tmp = dir.join(SEGMENT_TMP_FILE);
    let mut file = File::create(&tmp).map_err(|error| Error::io(&tmp, &error))?;
    serde_json::to_writer(&mut file, &header)
        .map_err(|error| Error::Serialization(error.to_string()))?;
    file.write_all(b"\n")
        .and_then(|_| file.write_all(&payload))
        .and_then(|_| file.sync_all())
        .map_err(|error| Error::io(&tmp, &error))?;

    let live = dir.join(SEGMENT_FILE);
    fs::rename(&tmp, &live).map_err(|error| Error::io(&live, &error))?;
    Ok(())
}

/// Loads the committed segment under `dir`.
///
/// A missing file is an empty store. Decode failures surface as
/// [`SegmentError`] so the caller can treat the segment as stale;
/// genuine I/O failures surface as [`Error::Io`].
pub fn read<D: Indexable>(dir: &Path) -> Result<Vec<D>, Error> {
    let live = dir.join(SEGMENT_FILE);
    let file = match File::open(&live) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(Error::io(&live, &error)),
    };

    let mut reader = BufReader::new(file);
    let mut header_line = String::new();
    reader
        .read_line(&mut header_line)
        .map_err(|error| Error::io(&live, &error))?;
    let header: Header =
        serde_json::from_str(header_line.trim_end()).map_err(|_| SegmentError::Header)?;
    if header.version != FORMAT_VERSION {
        return Err(SegmentError::Version {
            found: header.version,
            expected: FORMAT_VERSION,
        }
        .into());
    }

    let mut payload = Vec::new();
    reader
        .read_to_end(&mut payload)
        .map_err(|error| Error::io(&live, &error))?;
    if hash::digest_hex(&payload) != header.checksum {
        return Err(SegmentError::Checksum.into());
    }

    let mut docs = Vec::with_capacity(header.count);
    for (offset, line) in payload.split(|&byte| byte == b'\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        let doc =
            serde_json::from_slice(line).map_err(|_| SegmentError::Document { line: offset + 2 })?;
        docs.push(doc);
    }
    if docs.len() != header.count {
        return Err(SegmentError::Count {
            expected: header.count,
            found: docs.len(),
        }
        .into());
    }

    Ok(docs)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    use super::{read, write, SEGMENT_FILE};
    use crate::error::{Error, SegmentError};

    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    struct Probe {
        id: String,
        body: String,
    }

    impl crate::document::Indexable for Probe {
        type Field = ();

        fn id(&self) -> &str {
            &self.id
        }

        fn keyword_text(&self) -> String {
            self.body.clone()
        }

        fn term_values(&self) -> Vec<((), String)> {
            Vec::new()
        }

        fn sort_key(&self, _field: ()) -> Option<&str> {
            None
        }
    }

    fn probes() -> Vec<Probe> {
        vec![
            Probe {
                id: "1".into(),
                body: "dancing queen".into(),
            },
            Probe {
                id: "2".into(),
                body: "waterloo".into(),
            },
        ]
    }

    #[test]
    fn test_segment_round_trip() {
        let dir = TempDir::new().unwrap();

        write(dir.path(), &probes()).unwrap();
        let loaded: Vec<Probe> = read(dir.path()).unwrap();

        assert_eq!(loaded, probes());
    }

    #[test]
    fn test_segment_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let loaded: Vec<Probe> = read(dir.path()).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_segment_overwrite_replaces_contents() {
        let dir = TempDir::new().unwrap();

        write(dir.path(), &probes()).unwrap();
        write(dir.path(), &probes()[..1]).unwrap();

        let loaded: Vec<Probe> = read(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_segment_detects_flipped_payload_byte() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), &probes()).unwrap();

        let live = dir.path().join(SEGMENT_FILE);
        let mut bytes = std::fs::read(&live).unwrap();
        let last = bytes.len() - 2;
        bytes[last] = bytes[last].wrapping_add(1);
        std::fs::write(&live, bytes).unwrap();

        match read::<Probe>(dir.path()) {
            Err(Error::Segment(SegmentError::Checksum)) => {}
            other => panic!("expected checksum failure, got {other:?}"),
        }
    }

    #[test]
    fn test_segment_detects_truncation() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), &probes()).unwrap();

        let live = dir.path().join(SEGMENT_FILE);
        let bytes = std::fs::read(&live).unwrap();
        let truncated = &bytes[..bytes.len() - 10];
        std::fs::write(&live, truncated).unwrap();

        assert!(matches!(
            read::<Probe>(dir.path()),
            Err(Error::Segment(SegmentError::Checksum | SegmentError::Document { .. }))
        ));
    }

    #[test]
    fn test_segment_rejects_garbage_header() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SEGMENT_FILE), b"not a header\n").unwrap();

        assert!(matches!(
            read::<Probe>(dir.path()),
            Err(Error::Segment(SegmentError::Header))
        ));
    }
}
