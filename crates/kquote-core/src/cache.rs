//! Persistent LRU cache of `term -> code` resolutions.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::json_file;

/// Number of terms kept when no capacity is given.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// On-disk layout: `{"data": {term: code}, "order": [term, ...]}`, most recent first.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheSnapshot {
    #[serde(default)]
    data: BTreeMap<String, String>,
    #[serde(default)]
    order: Vec<String>,
}

/// Bounded mapping from user terms to resolved codes with recency ordering.
///
/// Every term in the mapping appears exactly once in the ordering and the
/// size never exceeds the capacity. Mutations stay in memory until
/// [`ResolutionCache::save`] is called.
#[derive(Debug, Clone)]
pub struct ResolutionCache {
    path: Option<PathBuf>,
    entries: HashMap<String, String>,
    order: VecDeque<String>,
    capacity: usize,
    dirty: bool,
}

impl ResolutionCache {
    /// Empty cache that is never written to disk. Capacity is at least one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            path: None,
            entries: HashMap::with_capacity(capacity + 1),
            order: VecDeque::with_capacity(capacity + 1),
            capacity,
            dirty: false,
        }
    }

    /// Empty cache bound to `path`, ignoring whatever is stored there.
    pub fn at(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(capacity)
        }
    }

    /// Loads the snapshot at `path` with the default capacity.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::load_with_capacity(path, DEFAULT_CACHE_CAPACITY)
    }

    /// Loads the snapshot at `path`; a missing or empty file yields an empty cache.
    ///
    /// Snapshots that break the membership or size invariants are repaired
    /// and the cache is marked dirty so the next save rewrites them.
    pub fn load_with_capacity(
        path: impl Into<PathBuf>,
        capacity: usize,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let mut cache = Self::at(path.clone(), capacity);

        let snapshot: CacheSnapshot = json_file::read_or_default(&path)?;
        cache.restore(snapshot);
        debug!(path = %path.display(), entries = cache.len(), "loaded resolution cache");
        Ok(cache)
    }

    fn restore(&mut self, snapshot: CacheSnapshot) {
        let CacheSnapshot { mut data, order } = snapshot;
        let stored_order_len = order.len();
        let stored_data_len = data.len();

        let mut seen = HashSet::with_capacity(order.len());
        for term in order {
            if data.contains_key(&term) && seen.insert(term.clone()) {
                self.order.push_back(term);
            }
        }
        // BTreeMap iteration appends orphans in sorted order.
        for term in data.keys() {
            if !seen.contains(term) {
                self.order.push_back(term.clone());
            }
        }
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_back() {
                data.remove(&evicted);
            }
        }
        self.entries = self
            .order
            .iter()
            .filter_map(|term| data.remove_entry(term))
            .collect();

        let repaired =
            stored_order_len != self.order.len() || stored_data_len != self.entries.len();
        if repaired {
            debug!(
                stored_order = stored_order_len,
                stored_data = stored_data_len,
                kept = self.order.len(),
                "repaired inconsistent cache snapshot"
            );
            self.dirty = true;
        }
    }

    /// Writes the cache when it changed since the last load or save.
    ///
    /// Returns whether anything was written. In-memory caches never write.
    pub fn save(&mut self) -> Result<bool, StoreError> {
        if !self.dirty {
            return Ok(false);
        }
        let Some(path) = self.path.as_deref() else {
            return Ok(false);
        };

        let snapshot = CacheSnapshot {
            data: self
                .entries
                .iter()
                .map(|(term, code)| (term.clone(), code.clone()))
                .collect(),
            order: self.order.iter().cloned().collect(),
        };
        json_file::write_pretty(path, &snapshot)?;

        self.dirty = false;
        Ok(true)
    }

    /// Looks up `term`; a hit moves it to the front.
    pub fn get(&mut self, term: &str) -> Option<String> {
        let code = self.entries.get(term)?.clone();
        self.promote(term);
        Some(code)
    }

    /// Records `term -> code` as the most recent entry.
    ///
    /// Re-setting an identical mapping only promotes it. Exceeding the
    /// capacity evicts the least recently used term.
    pub fn set(&mut self, term: &str, code: &str) {
        if self.entries.get(term).is_some_and(|existing| existing == code) {
            self.promote(term);
            return;
        }

        self.entries.insert(term.to_owned(), code.to_owned());
        self.promote(term);
        self.dirty = true;

        if self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_back() {
                self.entries.remove(&evicted);
                debug!(term = %evicted, "evicted least recently used cache entry");
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.dirty = true;
    }

    fn promote(&mut self, term: &str) {
        if let Some(index) = self.order.iter().position(|t| t == term) {
            if index == 0 {
                return;
            }
            self.order.remove(index);
        }
        self.order.push_front(term.to_owned());
    }

    /// Terms from most to least recently used.
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
