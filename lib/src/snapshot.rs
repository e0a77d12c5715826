//! Immutable point-in-time view of one committed index generation.
//!
//! A snapshot owns the document table, the by-identifier table, the
//! sorted keyword term dictionary and the exact-match field tables.
//! It is built once, published behind an `Arc`, and never mutated, so
//! any number of readers can hold it while the next generation is
//! being written.

extern crate hashbrown;

use std::{collections::BTreeMap, ops::Bound};

use hashbrown::HashMap;

use crate::{document::Indexable, normalizer::NormalizerPipeline, tokenizer::Tokenizer};

/// Position of a document in the snapshot's table.
pub(crate) type DocId = usize;

#[derive(Debug)]
pub struct Snapshot<D: Indexable> {
    docs: Vec<D>,
    by_id: HashMap<String, DocId>,
    /// Keyword postings, ordered so prefix clauses can range-scan.
    terms: BTreeMap<String, Vec<DocId>>,
    /// Exact-match postings per field tag.
    fields: HashMap<D::Field, HashMap<String, Vec<DocId>>>,
    generation: u64,
}

impl<D: Indexable> Snapshot<D> {
    pub(crate) fn empty() -> Self {
        Self {
            docs: Vec::new(),
            by_id: HashMap::new(),
            terms: BTreeMap::new(),
            fields: HashMap::new(),
            generation: 0,
        }
    }

    pub(crate) fn build(
        docs: Vec<D>,
        generation: u64,
        tokenizer: &Tokenizer,
        pipeline: &NormalizerPipeline,
    ) -> Self {
        let mut tokenizer = tokenizer.clone();
        let mut pipeline = pipeline.clone();

        let mut by_id = HashMap::with_capacity(docs.len());
        let mut terms: BTreeMap<String, Vec<DocId>> = BTreeMap::new();
        let mut fields: HashMap<D::Field, HashMap<String, Vec<DocId>>> = HashMap::new();

        for (id, doc) in docs.iter().enumerate() {
            by_id.insert(doc.id().to_owned(), id);

            let mut tokens = tokenizer.tokenize(&doc.keyword_text());
            pipeline.run(&mut tokens);
            for token in tokens {
                let postings = terms.entry(token.into_inner()).or_default();
                push_posting(postings, id);
            }

            for (field, value) in doc.term_values() {
                let postings = fields.entry(field).or_default().entry(value).or_default();
                push_posting(postings, id);
            }
        }

        Self {
            docs,
            by_id,
            terms,
            fields,
            generation,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn get_by_id(&self, id: &str) -> Option<&D> {
        self.by_id.get(id).map(|&doc_id| &self.docs[doc_id])
    }

    #[inline]
    pub(crate) fn doc(&self, id: DocId) -> &D {
        &self.docs[id]
    }

    #[inline]
    pub(crate) fn docs(&self) -> &[D] {
        &self.docs
    }

    /// Sorted postings for one exact keyword term.
    pub(crate) fn term_postings(&self, term: &str) -> Option<&[DocId]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    /// Sorted, deduplicated union of postings for every term starting
    /// with `prefix`.
    pub(crate) fn prefix_postings(&self, prefix: &str) -> Vec<DocId> {
        let mut out = Vec::new();
        let range = (Bound::Included(prefix), Bound::Unbounded);
        for (term, postings) in self.terms.range::<str, _>(range) {
            if !term.starts_with(prefix) {
                break;
            }
            out.extend_from_slice(postings);
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Sorted postings for one exact-match field value.
    pub(crate) fn field_postings(&self, field: D::Field, value: &str) -> Option<&[DocId]> {
        self.fields
            .get(&field)
            .and_then(|values| values.get(value))
            .map(Vec::as_slice)
    }
}

/// Postings are built in ascending document order; duplicates from a
/// multi-valued document are always adjacent.
fn push_posting(postings: &mut Vec<DocId>, id: DocId) {
    if postings.last() != Some(&id) {
        postings.push(id);
    }
}
