//! Durable document index with one exclusive writer and any number of
//! concurrent point-in-time readers.
//!
//! The committed document set lives in a single on-disk segment
//! (`segment` module). The published [`Snapshot`] is rebuilt from the
//! committed set by [`IndexStore::refresh`] and swapped in under a
//! write lock; readers clone the published `Arc` and are unaffected by
//! later commits.

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Arc, Mutex, RwLock,
    },
};

use crate::{
    document::Indexable, error::Error, normalizer::NormalizerPipeline, reader::Reader, segment,
    snapshot::Snapshot, tokenizer::Tokenizer, writer::StoreWriter,
};

pub struct IndexStore<D: Indexable> {
    dir: PathBuf,
    name: String,
    tokenizer: Tokenizer,
    pipeline: NormalizerPipeline,
    /// Documents as of the last commit. Refresh reads this; the writer
    /// replaces it on commit.
    committed: Mutex<Arc<Vec<D>>>,
    /// Point-in-time view served to readers.
    published: RwLock<Arc<Snapshot<D>>>,
    generation: AtomicU64,
    writer_open: AtomicBool,
    active_readers: Arc<AtomicUsize>,
}

impl<D: Indexable> IndexStore<D> {
    /// Opens the store under `dir`, loading the committed segment when
    /// one is present and readable.
    ///
    /// An unreadable segment (torn write, version drift) is discarded
    /// with a warning and the store opens empty; callers probe the
    /// document count to decide whether a rebuild is due. Genuine I/O
    /// failures are returned.
    pub fn open(
        dir: impl AsRef<Path>,
        tokenizer: Tokenizer,
        pipeline: NormalizerPipeline,
    ) -> Result<Arc<Self>, Error> {
        let dir = dir.as_ref().to_path_buf();
        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        let docs = match segment::read::<D>(&dir) {
            Ok(docs) => docs,
            Err(Error::Segment(error)) => {
                tracing::warn!(index = %name, %error, "discarding unreadable segment");
                Vec::new()
            }
            Err(error) => return Err(error),
        };

        let snapshot = Snapshot::build(docs.clone(), 0, &tokenizer, &pipeline);

        Ok(Arc::new(Self {
            dir,
            name,
            tokenizer,
            pipeline,
            committed: Mutex::new(Arc::new(docs)),
            published: RwLock::new(Arc::new(snapshot)),
            generation: AtomicU64::new(0),
            writer_open: AtomicBool::new(false),
            active_readers: Arc::new(AtomicUsize::new(0)),
        }))
    }

    /// Claims the store's single writer slot.
    ///
    /// A second concurrent claim is a caller bug and fails fast; the
    /// slot frees when the returned guard drops.
    pub fn open_for_write(self: &Arc<Self>) -> Result<StoreWriter<D>, Error> {
        if self
            .writer_open
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::WriterAlreadyOpen(self.name.clone()));
        }

        let committed = self.committed.lock().unwrap().as_ref().clone();
        Ok(StoreWriter::new(Arc::clone(self), committed))
    }

    /// Acquires a scoped reader pinned to the currently published
    /// snapshot.
    pub fn acquire_reader(&self) -> Reader<D> {
        let snapshot = Arc::clone(&self.published.read().unwrap());
        Reader::new(
            snapshot,
            Arc::clone(&self.active_readers),
            self.tokenizer.clone(),
            self.pipeline.clone(),
        )
    }

    /// Publishes the committed document set.
    ///
    /// Blocking: when this returns, every subsequently acquired reader
    /// sees the new generation. Readers acquired earlier keep the
    /// snapshot they hold.
    pub fn refresh(&self) {
        let docs = self.committed.lock().unwrap().as_ref().clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Snapshot::build(docs, generation, &self.tokenizer, &self.pipeline);
        *self.published.write().unwrap() = Arc::new(snapshot);
    }

    /// Readers currently alive, for leak diagnostics.
    pub fn active_readers(&self) -> usize {
        self.active_readers.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn set_committed(&self, docs: Vec<D>) {
        *self.committed.lock().unwrap() = Arc::new(docs);
    }

    pub(crate) fn release_writer(&self) {
        self.writer_open.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    use super::IndexStore;
    use crate::{
        error::Error,
        normalizer::{case::Lowercase, NormalizerPipeline},
        query::SearchQuery,
        tokenizer::{Standard, Tokenizer},
    };

    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    struct Probe {
        id: String,
        text: String,
        rank: String,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum Tag {
        Rank,
    }

    impl crate::document::Indexable for Probe {
        type Field = Tag;

        fn id(&self) -> &str {
            &self.id
        }

        fn keyword_text(&self) -> String {
            self.text.clone()
        }

        fn term_values(&self) -> Vec<(Tag, String)> {
            Vec::new()
        }

        fn sort_key(&self, field: Tag) -> Option<&str> {
            match field {
                Tag::Rank => Some(&self.rank),
            }
        }
    }

    fn probe(id: &str, text: &str, rank: &str) -> Probe {
        Probe {
            id: id.into(),
            text: text.into(),
            rank: rank.into(),
        }
    }

    fn open(dir: &TempDir) -> std::sync::Arc<IndexStore<Probe>> {
        let tokenizer = Tokenizer::Standard(Standard::new());
        let mut pipeline = NormalizerPipeline::new();
        pipeline.insert(Box::new(Lowercase::new()));
        IndexStore::open(dir.path(), tokenizer, pipeline).unwrap()
    }

    #[test]
    fn test_store_writer_exclusivity() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        let writer = store.open_for_write().unwrap();
        assert!(matches!(
            store.open_for_write(),
            Err(Error::WriterAlreadyOpen(_))
        ));

        drop(writer);
        assert!(store.open_for_write().is_ok());
    }

    #[test]
    fn test_store_reader_isolation_until_refresh() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        let mut writer = store.open_for_write().unwrap();
        writer.add_document(probe("1", "dancing queen", "a"));
        writer.commit().unwrap();

        // Committed but not yet published.
        let early = store.acquire_reader();
        assert_eq!(early.doc_count(), 0);

        store.refresh();
        assert_eq!(early.doc_count(), 0);

        let late = store.acquire_reader();
        assert_eq!(late.doc_count(), 1);
        assert!(late.generation() > early.generation());
    }

    #[test]
    fn test_store_reader_slots_release_on_drop() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        assert_eq!(store.active_readers(), 0);
        {
            let _one = store.acquire_reader();
            let _two = store.acquire_reader();
            assert_eq!(store.active_readers(), 2);
        }
        assert_eq!(store.active_readers(), 0);
    }

    #[test]
    fn test_store_reopen_restores_committed_docs() {
        let dir = TempDir::new().unwrap();
        {
            let store = open(&dir);
            let mut writer = store.open_for_write().unwrap();
            writer.add_document(probe("1", "waterloo", "a"));
            writer.add_document(probe("2", "gold", "b"));
            writer.commit().unwrap();
        }

        let store = open(&dir);
        let reader = store.acquire_reader();
        assert_eq!(reader.doc_count(), 2);
        assert_eq!(reader.get_by_id("2").unwrap().text, "gold");
    }

    #[test]
    fn test_store_reopened_writer_appends() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        let mut writer = store.open_for_write().unwrap();
        writer.add_document(probe("1", "one", "a"));
        writer.commit().unwrap();
        drop(writer);

        let mut writer = store.open_for_write().unwrap();
        writer.add_document(probe("2", "two", "b"));
        writer.commit().unwrap();
        store.refresh();

        let reader = store.acquire_reader();
        assert_eq!(reader.doc_count(), 2);
    }

    #[test]
    fn test_store_delete_all_replaces_wholesale() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        let mut writer = store.open_for_write().unwrap();
        writer.add_document(probe("1", "one", "a"));
        writer.commit().unwrap();
        store.refresh();

        writer.delete_all();
        writer.add_document(probe("9", "nine", "z"));
        writer.commit().unwrap();
        store.refresh();

        let reader = store.acquire_reader();
        assert_eq!(reader.doc_count(), 1);
        assert!(reader.get_by_id("1").is_none());
        assert!(reader.get_by_id("9").is_some());
    }

    #[test]
    fn test_store_search_sorts_and_limits() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        let mut writer = store.open_for_write().unwrap();
        writer.add_document(probe("1", "song alpha", "c"));
        writer.add_document(probe("2", "song beta", "a"));
        writer.add_document(probe("3", "song gamma", "b"));
        writer.commit().unwrap();
        store.refresh();

        let reader = store.acquire_reader();
        let query = SearchQuery {
            keywords: "song".into(),
            filters: Vec::new(),
            sort: Tag::Rank,
            limit: 2,
        };

        let hits = reader.search(&query);
        let ids: Vec<&str> = hits.iter().map(|hit| hit.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }
}
