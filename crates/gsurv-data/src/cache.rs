//! Content-addressed dataset cache
//!
//! Datasets are memoized by [`FileId`]. Concurrent loads of one identity
//! queue on a per-key in-flight slot, so each identity parses once. The
//! parse runs outside any map lock; readers of other keys (and `len`) never
//! wait for it. A finished dataset is published in one insert, so no
//! partially built entry is ever visible. Failed parses are not cached.
//!
//! Invalidation is explicit: [`DatasetCache::invalidate`] drops one entry,
//! [`DatasetCache::clear`] drops everything, and inserting beyond
//! `max_entries` evicts the oldest insertion.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::dataset::ParsedDataset;
use crate::error::Result;
use crate::source::FileId;

const DEFAULT_MAX_ENTRIES: usize = 32;

/// Per-key lock held while one identity is being parsed
type InFlight = Arc<Mutex<()>>;

/// Memoizes parsed datasets by content identity
pub struct DatasetCache {
    entries: DashMap<FileId, Arc<ParsedDataset>>,
    in_flight: DashMap<FileId, InFlight>,
    /// Insertion order, oldest first. Held for every change to `entries`.
    order: Mutex<VecDeque<FileId>>,
    max_entries: usize,
    parses: AtomicU64,
    hits: AtomicU64,
}

impl DatasetCache {
    /// Create a cache with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache holding at most `max_entries` datasets
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            max_entries: max_entries.max(1),
            parses: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Return the cached dataset for `id`, parsing it with `parse` on a miss.
    ///
    /// The boolean is `true` when the dataset came from the cache.
    pub fn get_or_parse<F>(&self, id: &FileId, parse: F) -> Result<(Arc<ParsedDataset>, bool)>
    where
        F: FnOnce() -> Result<ParsedDataset>,
    {
        if let Some(hit) = self.hit(id) {
            return Ok((hit, true));
        }

        // The shard guard is released at the end of this statement
        let slot: InFlight = Arc::clone(
            self.in_flight
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

        // Another loader may have finished while this one waited
        if let Some(hit) = self.hit(id) {
            drop(guard);
            self.release_slot(id, &slot);
            return Ok((hit, true));
        }

        self.parses.fetch_add(1, Ordering::Relaxed);
        let parsed = parse();
        let result = parsed.map(|dataset| {
            let dataset = Arc::new(dataset);
            self.insert(id, Arc::clone(&dataset));
            dataset
        });

        drop(guard);
        self.release_slot(id, &slot);

        let dataset = result?;
        debug!(file_id = %id.short(), sheets = dataset.len(), "Cached dataset");
        Ok((dataset, false))
    }

    fn hit(&self, id: &FileId) -> Option<Arc<ParsedDataset>> {
        let hit = self.get(id)?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(hit)
    }

    fn release_slot(&self, id: &FileId, slot: &InFlight) {
        self.in_flight
            .remove_if(id, |_, current| Arc::ptr_eq(current, slot));
    }

    fn insert(&self, id: &FileId, dataset: Arc<ParsedDataset>) {
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        if self.entries.insert(id.clone(), dataset).is_none() {
            order.push_back(id.clone());
        }
        while order.len() > self.max_entries {
            if let Some(oldest) = order.pop_front() {
                self.entries.remove(&oldest);
                debug!(file_id = %oldest.short(), "Evicted dataset");
            }
        }
    }

    /// Cached dataset for `id`, without parsing
    #[must_use]
    pub fn get(&self, id: &FileId) -> Option<Arc<ParsedDataset>> {
        self.entries.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether `id` is cached
    #[must_use]
    pub fn contains(&self, id: &FileId) -> bool {
        self.entries.contains_key(id)
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, id: &FileId) -> bool {
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = self.entries.remove(id).is_some();
        if removed {
            order.retain(|cached| cached != id);
        }
        removed
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        order.clear();
        self.entries.clear();
    }

    /// Number of cached datasets
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total parses performed (cache misses that reached the parser)
    #[must_use]
    pub fn parse_count(&self) -> u64 {
        self.parses.load(Ordering::Relaxed)
    }

    /// Total lookups answered from the cache
    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}
