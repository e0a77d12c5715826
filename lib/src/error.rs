extern crate thiserror;

use std::{io, path::PathBuf};

use thiserror::Error;

/// Index-store error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A second writer was requested while one is still live.
    #[error("a writer is already open for index `{0}`")]
    WriterAlreadyOpen(String),

    #[error("index I/O error at {path}: {kind}")]
    Io { path: PathBuf, kind: io::ErrorKind },

    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("{0}")]
    Segment(#[from] SegmentError),
}

impl Error {
    pub(crate) fn io(path: &std::path::Path, error: &io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            kind: error.kind(),
        }
    }
}

/// Committed-segment decode errors. A store may treat these as "no
/// committed data" and let the caller rebuild.
#[derive(Debug, Error, PartialEq)]
pub enum SegmentError {
    #[error("segment header is malformed")]
    Header,

    #[error("segment version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("segment checksum mismatch")]
    Checksum,

    #[error("segment document count mismatch: header says {expected}, payload has {found}")]
    Count { expected: usize, found: usize },

    #[error("segment payload line {line} is malformed")]
    Document { line: usize },
}
