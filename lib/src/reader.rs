use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::{
    document::Indexable,
    normalizer::NormalizerPipeline,
    query::{self, SearchQuery},
    snapshot::Snapshot,
    tokenizer::Tokenizer,
};

/// Scoped handle over one published snapshot.
///
/// The snapshot a reader holds never changes: commits and refreshes
/// that happen after acquisition publish a *new* snapshot for later
/// readers. The handle releases its reader slot on drop, on every exit
/// path.
pub struct Reader<D: Indexable> {
    snapshot: Arc<Snapshot<D>>,
    active: Arc<AtomicUsize>,
    tokenizer: Tokenizer,
    pipeline: NormalizerPipeline,
}

impl<D: Indexable> Reader<D> {
    pub(crate) fn new(
        snapshot: Arc<Snapshot<D>>,
        active: Arc<AtomicUsize>,
        tokenizer: Tokenizer,
        pipeline: NormalizerPipeline,
    ) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self {
            snapshot,
            active,
            tokenizer,
            pipeline,
        }
    }

    /// Number of documents visible to this reader.
    #[inline]
    pub fn doc_count(&self) -> usize {
        self.snapshot.len()
    }

    /// Generation this reader is pinned to.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.snapshot.generation()
    }

    /// Exact-match point lookup; absence is not an error.
    pub fn get_by_id(&self, id: &str) -> Option<D> {
        self.snapshot.get_by_id(id).cloned()
    }

    /// Every document in this reader's snapshot, in stored order.
    pub fn docs(&self) -> impl Iterator<Item = &D> {
        self.snapshot.docs().iter()
    }

    /// Runs a compound query, hydrating matches from stored fields.
    pub fn search(&self, query: &SearchQuery<D::Field>) -> Vec<D> {
        let mut tokenizer = self.tokenizer.clone();
        let mut pipeline = self.pipeline.clone();

        let mut tokens = tokenizer.tokenize(&query.keywords);
        pipeline.run(&mut tokens);

        query::execute(&self.snapshot, query, tokens)
            .into_iter()
            .map(|id| self.snapshot.doc(id).clone())
            .collect()
    }
}

impl<D: Indexable> Drop for Reader<D> {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
