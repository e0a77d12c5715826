//! Builds track-index queries from the caller's search input.

use docdex::{SearchQuery, TermClause};

use crate::document::TrackField;

/// Sort orders selectable by the caller. Each maps to one precomputed
/// sort-key field; ordering at query time is plain string comparison.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortMode {
    /// Artist name, then discography order.
    #[default]
    Default,
    /// Discography order: year, album, track number.
    Artist,
    /// Album name, then track number.
    Album,
    /// Track name.
    Track,
}

impl SortMode {
    pub(crate) fn field(self) -> TrackField {
        match self {
            SortMode::Default => TrackField::SortDefault,
            SortMode::Artist => TrackField::SortArtist,
            SortMode::Album => TrackField::SortAlbum,
            SortMode::Track => TrackField::SortTrack,
        }
    }
}

/// Optional exact-match constraints. An empty filter constrains
/// nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackFilter {
    pub genre: Option<String>,
    pub year: Option<u32>,
}

impl TrackFilter {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn genre(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
            year: None,
        }
    }

    pub fn year(year: u32) -> Self {
        Self {
            genre: None,
            year: Some(year),
        }
    }

    pub fn genre_and_year(genre: impl Into<String>, year: u32) -> Self {
        Self {
            genre: Some(genre.into()),
            year: Some(year),
        }
    }
}

/// Assembles the compound keyword + filter + sort query served by the
/// track index.
#[derive(Clone, Copy, Debug)]
pub struct QueryBuilder {
    max_hits: usize,
}

impl QueryBuilder {
    pub fn new(max_hits: usize) -> Self {
        Self { max_hits }
    }

    pub fn build(
        &self,
        keywords: &str,
        filter: &TrackFilter,
        sort: SortMode,
    ) -> SearchQuery<TrackField> {
        let mut filters = Vec::new();
        if let Some(genre) = &filter.genre {
            filters.push(TermClause {
                field: TrackField::Genre,
                value: genre.clone(),
            });
        }
        if let Some(year) = filter.year {
            filters.push(TermClause {
                field: TrackField::Year,
                value: year.to_string(),
            });
        }

        SearchQuery {
            keywords: keywords.to_string(),
            filters,
            sort: sort.field(),
            limit: self.max_hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryBuilder, SortMode, TrackFilter};
    use crate::document::TrackField;

    #[test]
    fn test_query_builder_filters_and_sort() {
        let builder = QueryBuilder::new(50);
        let query = builder.build(
            "dancing qu",
            &TrackFilter::genre_and_year("Pop", 1976),
            SortMode::Album,
        );

        assert_eq!(query.keywords, "dancing qu");
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].field, TrackField::Genre);
        assert_eq!(query.filters[1].value, "1976");
        assert_eq!(query.sort, TrackField::SortAlbum);
        assert_eq!(query.limit, 50);
    }

    #[test]
    fn test_query_builder_no_filter_adds_no_clause() {
        let builder = QueryBuilder::new(10);
        let query = builder.build("", &TrackFilter::none(), SortMode::Default);

        assert!(query.filters.is_empty());
        assert!(query.keywords.is_empty());
    }
}
