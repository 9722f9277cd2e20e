// Corpus Search Cache
// Bounded corpus cache: population is serialized, reads are shared

use crate::data::{source_key, Corpus};
use crate::types::CorpusError;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Default number of corpora kept in memory
pub const DEFAULT_CACHE_CAPACITY: usize = 1;

/// Corpora keyed by source, evicting the oldest once capacity is reached
///
/// Lookups take a read lock and hand out an `Arc<Corpus>`, so any number of
/// searches can run against a cached corpus at once. Loads are serialized by
/// a separate population lock; a corpus that was evicted stays alive until
/// its last reader drops it.
pub struct CorpusCache {
    capacity: usize,
    slots: RwLock<VecDeque<(String, Arc<Corpus>)>>,
    populate: Mutex<()>,
}

impl CorpusCache {
    /// Create a cache holding at most `capacity` corpora (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            slots: RwLock::new(VecDeque::with_capacity(capacity)),
            populate: Mutex::new(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached corpus for a source, if present
    pub fn get(&self, source: &str) -> Option<Arc<Corpus>> {
        let key = source_key(source);
        self.slots
            .read()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, corpus)| Arc::clone(corpus))
    }

    /// Return the cached corpus or build it with `load`
    ///
    /// On a miss the population lock is held for the duration of `load`, so
    /// concurrent misses load at most once. Room is made before `load` runs,
    /// so at capacity the oldest corpus is evicted even if the load fails.
    pub fn get_or_load<F>(&self, source: &str, load: F) -> Result<Arc<Corpus>, CorpusError>
    where
        F: FnOnce() -> Result<Corpus, CorpusError>,
    {
        if let Some(corpus) = self.get(source) {
            debug!(source, "corpus cache hit");
            return Ok(corpus);
        }

        let _population = self.populate.lock();

        // Another caller may have loaded it while we waited
        if let Some(corpus) = self.get(source) {
            debug!(source, "corpus cache hit after wait");
            return Ok(corpus);
        }

        debug!(source, "corpus cache miss");

        // Make room first so the old and new corpora are never both cached
        {
            let mut slots = self.slots.write();
            while slots.len() >= self.capacity {
                if let Some((evicted, _)) = slots.pop_front() {
                    debug!(evicted = %evicted, "evicting cached corpus");
                }
            }
        }

        let corpus = Arc::new(load()?);
        self.slots
            .write()
            .push_back((source_key(source), Arc::clone(&corpus)));

        Ok(corpus)
    }

    /// Keys of cached sources, oldest first
    pub fn cached_sources(&self) -> Vec<String> {
        self.slots.read().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Drop every cached corpus
    pub fn clear(&self) {
        let _population = self.populate.lock();
        self.slots.write().clear();
    }
}

impl Default for CorpusCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for CorpusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusCache")
            .field("capacity", &self.capacity)
            .field("cached", &self.cached_sources())
            .finish()
    }
}
