//! The catalogue search service.
//!
//! Owns the two index stores and their writers, the facet registry and
//! the rebuild-decision state machine. Rebuilds run as a two-stage
//! pipeline: a producer thread parses the snapshot and sends typed
//! records over a bounded channel while this side builds documents and
//! feeds both writers. Nothing becomes visible to readers until both
//! commits succeeded and both indices refreshed; queries issued during
//! a rebuild keep hitting the previously published snapshots.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, RwLock,
    },
    thread,
};

use crossbeam_channel::bounded;
use tracing::{error, info, warn};

use docdex::{
    normalizer::{case::Lowercase, NormalizerPipeline},
    tokenizer::{Standard, Tokenizer},
    IndexStore, StoreWriter,
};

use crate::{
    builder::DocumentBuilder,
    config::EngineConfig,
    document::{Artist, ArtistDocument, Track, TrackDocument},
    error::{Error, SnapshotError},
    facet::FacetRegistry,
    parser::{Record, SnapshotParser, SnapshotSource},
    query::{QueryBuilder, SortMode, TrackFilter},
};

/// Rebuild-decision states.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EngineState {
    Uninitialized,
    Probing,
    RebuildNeeded,
    Ready,
}

pub struct SearchEngine {
    config: EngineConfig,
    source: Box<dyn SnapshotSource>,
    builder: DocumentBuilder,
    queries: QueryBuilder,
    artists: Arc<IndexStore<ArtistDocument>>,
    tracks: Arc<IndexStore<TrackDocument>>,
    artist_writer: Mutex<Option<StoreWriter<ArtistDocument>>>,
    track_writer: Mutex<Option<StoreWriter<TrackDocument>>>,
    facets: RwLock<FacetRegistry>,
    state: Mutex<EngineState>,
    /// Flips once the engine first reaches `Ready` and stays set: a
    /// later failed rebuild leaves previously committed data live.
    served: AtomicBool,
    /// Serializes `initialise` and `reindex` against each other.
    lifecycle: Mutex<()>,
}

impl SearchEngine {
    /// Opens both index stores under the configured root. No rebuild
    /// decision happens until [`initialise`](Self::initialise).
    pub fn new(config: EngineConfig, source: Box<dyn SnapshotSource>) -> Result<Self, Error> {
        let tokenizer = Tokenizer::Standard(Standard::new());
        let mut pipeline = NormalizerPipeline::new();
        pipeline.insert(Box::new(Lowercase::new()));

        let artists = IndexStore::open(config.artist_dir(), tokenizer.clone(), pipeline.clone())?;
        let tracks = IndexStore::open(config.track_dir(), tokenizer, pipeline)?;
        let queries = QueryBuilder::new(config.max_hits);

        Ok(Self {
            config,
            source,
            builder: DocumentBuilder::new(),
            queries,
            artists,
            tracks,
            artist_writer: Mutex::new(None),
            track_writer: Mutex::new(None),
            facets: RwLock::new(FacetRegistry::new()),
            state: Mutex::new(EngineState::Uninitialized),
            served: AtomicBool::new(false),
            lifecycle: Mutex::new(()),
        })
    }

    /// Runs the rebuild-decision state machine. Idempotent: an engine
    /// that already reached `Ready` returns immediately.
    pub fn initialise(&self) -> Result<(), Error> {
        let _lifecycle = self.lifecycle.lock().unwrap();
        if self.state() == EngineState::Ready {
            return Ok(());
        }
        self.ensure_writers()?;
        self.decide_and_rebuild(false).map(|_| ())
    }

    /// Operator-triggered rebuild. With `force`, the probe is skipped
    /// and the catalogue is rebuilt unconditionally; otherwise this
    /// behaves like a re-run of the rebuild decision. Returns whether
    /// a rebuild actually ran.
    pub fn reindex(&self, force: bool) -> Result<bool, Error> {
        let _lifecycle = self.lifecycle.lock().unwrap();
        self.ensure_writers()?;
        self.decide_and_rebuild(force)
    }

    pub fn state(&self) -> EngineState {
        *self.state.lock().unwrap()
    }

    /// Point lookup on the artist index.
    pub fn get_artist_by_id(&self, id: &str) -> Result<Option<Artist>, Error> {
        self.ensure_ready()?;
        let reader = self.artists.acquire_reader();
        Ok(reader.get_by_id(id).map(|doc| doc.artist))
    }

    /// Point lookup on the track index.
    pub fn get_track_by_id(&self, id: &str) -> Result<Option<Track>, Error> {
        self.ensure_ready()?;
        let reader = self.tracks.acquire_reader();
        Ok(reader.get_by_id(id).map(|doc| doc.track))
    }

    /// Compound keyword + filter search over the track index, ordered
    /// by the requested sort mode, capped at the configured hit count.
    pub fn search(
        &self,
        keywords: &str,
        filter: &TrackFilter,
        sort: SortMode,
    ) -> Result<Vec<Track>, Error> {
        self.ensure_ready()?;
        let query = self.queries.build(keywords, filter, sort);
        let reader = self.tracks.acquire_reader();
        Ok(reader
            .search(&query)
            .into_iter()
            .map(|doc| doc.track)
            .collect())
    }

    /// Distinct genres, ascending.
    pub fn genre_list(&self) -> Result<Vec<String>, Error> {
        self.ensure_ready()?;
        Ok(self.facets.read().unwrap().genre_list())
    }

    /// Distinct release years, ascending.
    pub fn year_list(&self) -> Result<Vec<String>, Error> {
        self.ensure_ready()?;
        Ok(self.facets.read().unwrap().year_list())
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.served.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::NotInitialised)
        }
    }

    /// Opens both writers once; later calls are no-ops. The writers
    /// stay open for the engine's lifetime and every rebuild reuses
    /// them.
    fn ensure_writers(&self) -> Result<(), Error> {
        let mut artist_writer = self.artist_writer.lock().unwrap();
        if artist_writer.is_none() {
            *artist_writer = Some(self.artists.open_for_write()?);
        }
        let mut track_writer = self.track_writer.lock().unwrap();
        if track_writer.is_none() {
            *track_writer = Some(self.tracks.open_for_write()?);
        }
        Ok(())
    }

    fn set_state(&self, state: EngineState) {
        *self.state.lock().unwrap() = state;
    }

    /// Probe, then rebuild if the probe (or `force`) demands it.
    fn decide_and_rebuild(&self, force: bool) -> Result<bool, Error> {
        let previous = self.state();
        self.set_state(EngineState::Probing);

        if !force && !self.probe_needed() {
            self.reload_facets();
            self.set_state(EngineState::Ready);
            self.served.store(true, Ordering::SeqCst);
            return Ok(false);
        }

        self.set_state(EngineState::RebuildNeeded);
        match self.rebuild() {
            Ok(()) => {
                self.set_state(EngineState::Ready);
                self.served.store(true, Ordering::SeqCst);
                Ok(true)
            }
            Err(rebuild_error) => {
                self.set_state(previous);
                error!(
                    error = %rebuild_error,
                    "catalogue rebuild failed; previously committed data remains authoritative"
                );
                Err(rebuild_error)
            }
        }
    }

    /// An index that opened empty (fresh directory, discarded segment)
    /// means the catalogue has to be rebuilt before it can be served.
    fn probe_needed(&self) -> bool {
        let artists = self.artists.acquire_reader();
        let tracks = self.tracks.acquire_reader();
        artists.doc_count() == 0 || tracks.doc_count() == 0
    }

    /// Warm start: rederive the facet lists from the committed track
    /// documents instead of reparsing the snapshot.
    fn reload_facets(&self) {
        let reader = self.tracks.acquire_reader();
        let registry = FacetRegistry::from_tracks(reader.docs().map(|doc| &doc.track));
        *self.facets.write().unwrap() = registry;
    }

    fn rebuild(&self) -> Result<(), Error> {
        info!("rebuilding catalogue indices from snapshot");

        let stream = self
            .source
            .open()
            .map_err(|source_error| SnapshotError::Source(source_error.kind()))?;

        let (sender, receiver) = bounded(self.config.channel_capacity);
        let producer = thread::spawn(move || {
            let mut parser = SnapshotParser::new(stream);
            for record in parser.by_ref() {
                if sender.send(record).is_err() {
                    // Consumer went away; no point parsing further.
                    break;
                }
            }
            parser.finish()
        });

        let mut artist_guard = self.artist_writer.lock().unwrap();
        let mut track_guard = self.track_writer.lock().unwrap();
        let artist_writer = writer(&mut artist_guard);
        let track_writer = writer(&mut track_guard);

        artist_writer.delete_all();
        track_writer.delete_all();

        let mut dropped = 0usize;
        for record in receiver {
            match record {
                Record::Artist(record) => {
                    artist_writer.add_document(self.builder.build_artist(&record));
                }
                Record::Track(record) => match self.builder.build_track(&record) {
                    Ok(doc) => track_writer.add_document(doc),
                    Err(reason) => {
                        dropped += 1;
                        warn!(track = %record.track_id, %reason, "dropping record without a stable sort identity");
                    }
                },
            }
        }

        let facets = producer
            .join()
            .expect("snapshot parser thread panicked")
            .map_err(Error::from)?;

        // Publish only after both commits survive; refresh is blocking,
        // so once it returns new readers see the new generation.
        artist_writer.commit()?;
        track_writer.commit()?;
        self.artists.refresh();
        self.tracks.refresh();
        *self.facets.write().unwrap() = facets;

        info!(
            artists = artist_writer.len(),
            tracks = track_writer.len(),
            dropped,
            "catalogue rebuild complete"
        );
        Ok(())
    }
}

/// The writers are opened by `ensure_writers` before any rebuild.
fn writer<'a, D: docdex::Indexable>(
    guard: &'a mut MutexGuard<'_, Option<StoreWriter<D>>>,
) -> &'a mut StoreWriter<D> {
    guard.as_mut().expect("writer opened before rebuild")
}
