//! Memoized view derivations
//!
//! Toggling between daily, weekly and monthly views of the same prediction
//! run re-uses the buckets derived the first time. Entries are keyed by series
//! id, so a new run never sees the previous run's buckets.

use crate::aggregation::BucketingEngine;
use algae_forecast_shared::{Bucket, Series, ViewMode};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use uuid::Uuid;

/// Cache key: one derived view of one series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub series_id: Uuid,
    pub mode: ViewMode,
}

impl ViewKey {
    pub fn new(series_id: Uuid, mode: ViewMode) -> Self {
        Self { series_id, mode }
    }
}

/// LRU cache of derived bucket lists
pub struct ViewCache {
    entries: LruCache<ViewKey, Arc<Vec<Bucket>>>,
    hits: u64,
    misses: u64,
}

impl ViewCache {
    /// A zero capacity is raised to one entry
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &ViewKey) -> Option<Arc<Vec<Bucket>>> {
        match self.entries.get(key) {
            Some(buckets) => {
                self.hits += 1;
                Some(Arc::clone(buckets))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: ViewKey, buckets: Vec<Bucket>) -> Arc<Vec<Bucket>> {
        let buckets = Arc::new(buckets);
        self.entries.put(key, Arc::clone(&buckets));
        buckets
    }

    /// Cached view of `series`, deriving and storing it on a miss
    pub fn get_or_derive(
        &mut self,
        engine: &BucketingEngine,
        series: &Series,
        mode: ViewMode,
    ) -> Arc<Vec<Bucket>> {
        let key = ViewKey::new(series.id(), mode);
        if let Some(buckets) = self.get(&key) {
            return buckets;
        }

        log::debug!("Deriving {} view for series {}", mode, series.id());
        self.insert(key, engine.select_view(series, mode))
    }

    /// Drop every view derived from `series_id`
    pub fn evict_series(&mut self, series_id: Uuid) {
        for mode in ViewMode::ALL {
            self.entries.pop(&ViewKey::new(series_id, mode));
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn resize(&mut self, capacity: usize) {
        self.entries
            .resize(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN));
    }

    pub fn get_stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        CacheStats {
            capacity: self.entries.cap().get(),
            entry_count: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                self.hits as f32 / lookups as f32
            },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub capacity: usize,
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f32,
}

/// Thread-safe cache wrapper, shared by every screen of one session
#[derive(Clone)]
pub struct ThreadSafeViewCache {
    inner: Arc<Mutex<ViewCache>>,
}

impl ThreadSafeViewCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewCache::new(capacity))),
        }
    }

    pub fn get_or_derive(
        &self,
        engine: &BucketingEngine,
        series: &Series,
        mode: ViewMode,
    ) -> Arc<Vec<Bucket>> {
        self.inner.lock().get_or_derive(engine, series, mode)
    }

    pub fn evict_series(&self, series_id: Uuid) {
        self.inner.lock().evict_series(series_id);
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn get_stats(&self) -> CacheStats {
        self.inner.lock().get_stats()
    }
}
