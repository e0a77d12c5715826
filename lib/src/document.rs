use std::{fmt::Debug, hash::Hash};

use serde::{de::DeserializeOwned, Serialize};

/// Marker for the closed set of field tags of one document kind.
/// Implemented for free by any field enum with the right derives.
pub trait FieldKey: Copy + Debug + Eq + Hash + Send + Sync + 'static {}

impl<T> FieldKey for T where T: Copy + Debug + Eq + Hash + Send + Sync + 'static {}

/// A document that can live in an index store.
///
/// Implementations are plain data: every accessor must be pure so that
/// rebuilding a snapshot from the same committed documents always
/// produces the same index.
pub trait Indexable: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Field: FieldKey;

    /// Stable external identifier, unique within the index.
    fn id(&self) -> &str;

    /// Free text tokenized into the keywords field.
    fn keyword_text(&self) -> String;

    /// Exact-match term values; multi-valued fields emit one entry per
    /// value.
    fn term_values(&self) -> Vec<(Self::Field, String)>;

    /// Precomputed sort key stored under the given field, if any.
    fn sort_key(&self, field: Self::Field) -> Option<&str>;
}
