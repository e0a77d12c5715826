use std::path::PathBuf;

use serde::Deserialize;

/// Engine configuration, deserializable from whatever settings layer
/// the host application uses.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the `artists/` and `tracks/` index
    /// directories.
    pub index_root: PathBuf,

    /// Hard cap on search hits.
    pub max_hits: usize,

    /// Capacity of the rebuild pipeline channel between the parser
    /// thread and the index writers.
    pub channel_capacity: usize,
}

impl EngineConfig {
    pub fn new(index_root: impl Into<PathBuf>) -> Self {
        Self {
            index_root: index_root.into(),
            ..Self::default()
        }
    }

    pub(crate) fn artist_dir(&self) -> PathBuf {
        self.index_root.join("artists")
    }

    pub(crate) fn track_dir(&self) -> PathBuf {
        self.index_root.join("tracks")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index_root: PathBuf::from("index"),
            max_hits: 100,
            channel_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;

    #[test]
    fn test_config_index_dirs() {
        let config = EngineConfig::new("/var/lib/jukedex");
        assert!(config.artist_dir().ends_with("artists"));
        assert!(config.track_dir().ends_with("tracks"));
        assert_eq!(config.max_hits, 100);
    }
}
