use std::sync::Arc;

use crate::{document::Indexable, error::Error, segment, store::IndexStore};

/// Exclusive write handle over one [`IndexStore`].
///
/// The writer works on a private copy of the committed document set:
/// additions and `delete_all` are invisible to readers until `commit`
/// persists the set and the store's `refresh` publishes it. Dropping
/// the guard frees the store's writer slot.
pub struct StoreWriter<D: Indexable> {
    store: Arc<IndexStore<D>>,
    docs: Vec<D>,
}

impl<D: Indexable> StoreWriter<D> {
    pub(crate) fn new(store: Arc<IndexStore<D>>, docs: Vec<D>) -> Self {
        Self { store, docs }
    }

    /// Clears the working set; the next commit replaces the index
    /// wholesale.
    pub fn delete_all(&mut self) {
        self.docs.clear();
    }

    pub fn add_document(&mut self, doc: D) {
        self.docs.push(doc);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Durably replaces the committed segment with the working set.
    ///
    /// Publication to readers is a separate step: call the store's
    /// `refresh` once every cooperating index has committed.
    pub fn commit(&mut self) -> Result<(), Error> {
        segment::write(self.store.dir(), &self.docs)?;
        self.store.set_committed(self.docs.clone());
        Ok(())
    }
}

impl<D: Indexable> Drop for StoreWriter<D> {
    fn drop(&mut self) {
        self.store.release_writer();
    }
}
