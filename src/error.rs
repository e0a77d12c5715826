extern crate thiserror;

use std::io;

use thiserror::Error;

/// Engine error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A query arrived before the engine ever reached `Ready`.
    #[error("engine is not initialised")]
    NotInitialised,

    #[error("{0}")]
    Snapshot(#[from] SnapshotError),

    #[error("{0}")]
    Index(#[from] docdex::Error),
}

/// Snapshot acquisition and stream failures. Fatal to the rebuild
/// attempt that hit them; previously committed data stays live.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("snapshot source error: {0}")]
    Source(io::ErrorKind),

    #[error("snapshot stream error: {0}")]
    Stream(io::ErrorKind),
}

/// A record whose sort identity cannot be derived. Fatal to that
/// record only: the rebuild drops it and continues.
#[derive(Debug, Error, PartialEq)]
pub enum IdentityError {
    #[error("album id `{0}` is not a sortable integer")]
    AlbumId(String),
}
