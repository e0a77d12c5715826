pub mod document;
pub mod error;
pub mod hash;
pub mod normalizer;
pub mod query;
pub mod reader;
pub mod segment;
pub mod snapshot;
pub mod store;
pub mod token;
pub mod tokenizer;
pub mod util;
pub mod writer;

pub use document::{FieldKey, Indexable};
pub use error::{Error, SegmentError};
pub use query::{SearchQuery, TermClause};
pub use reader::Reader;
pub use store::IndexStore;
pub use writer::StoreWriter;
