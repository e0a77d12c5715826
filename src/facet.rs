//! Distinct filter values observed in the catalogue.
//!
//! The registry is rebuilt from scratch on every rebuild and owned by
//! the engine instance; it is published together with the refreshed
//! indices, never mid-rebuild.

use std::collections::BTreeSet;

use crate::{document::Track, record::YEAR_UNSPECIFIED};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacetRegistry {
    genres: BTreeSet<String>,
    years: BTreeSet<u32>,
}

impl FacetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rederives the registry from committed track documents, for warm
    /// starts that skip the rebuild.
    pub fn from_tracks<'a>(tracks: impl Iterator<Item = &'a Track>) -> Self {
        let mut registry = Self::new();
        for track in tracks {
            for genre in &track.genres {
                registry.add_genre(genre);
            }
            registry.add_year(track.year);
        }
        registry
    }

    pub fn add_genre(&mut self, genre: &str) {
        if !genre.is_empty() && !self.genres.contains(genre) {
            self.genres.insert(genre.to_string());
        }
    }

    /// The unknown-year sentinel is not a meaningful filter option and
    /// is never listed.
    pub fn add_year(&mut self, year: u32) {
        if year != YEAR_UNSPECIFIED {
            self.years.insert(year);
        }
    }

    /// Distinct genres, ascending.
    pub fn genre_list(&self) -> Vec<String> {
        self.genres.iter().cloned().collect()
    }

    /// Distinct years, ascending numerically.
    pub fn year_list(&self) -> Vec<String> {
        self.years.iter().map(u32::to_string).collect()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.years.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::FacetRegistry;
    use crate::record::YEAR_UNSPECIFIED;

    #[test]
    fn test_facets_dedup_and_sort() {
        let mut registry = FacetRegistry::new();
        registry.add_genre("Rock");
        registry.add_genre("Blues");
        registry.add_genre("Rock");
        registry.add_year(1999);
        registry.add_year(1976);
        registry.add_year(1999);

        assert_eq!(registry.genre_list(), vec!["Blues", "Rock"]);
        assert_eq!(registry.year_list(), vec!["1976", "1999"]);
    }

    #[test]
    fn test_facets_years_sort_numerically() {
        let mut registry = FacetRegistry::new();
        registry.add_year(1005);
        registry.add_year(999);

        assert_eq!(registry.year_list(), vec!["999", "1005"]);
    }

    #[test]
    fn test_facets_skip_sentinels() {
        let mut registry = FacetRegistry::new();
        registry.add_year(YEAR_UNSPECIFIED);
        registry.add_genre("");

        assert!(registry.is_empty());
    }
}
