pub mod builder;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod facet;
pub mod genre;
pub mod parser;
pub mod query;
pub mod record;

pub use config::EngineConfig;
pub use document::{Artist, Track};
pub use engine::{EngineState, SearchEngine};
pub use error::Error;
pub use parser::{FileSnapshotSource, SnapshotSource};
pub use query::{SortMode, TrackFilter};
