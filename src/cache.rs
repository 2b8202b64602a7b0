use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{debug, error, trace};

use crate::models::{CategoryTree, LedgerSnapshot, Rdfi};
use crate::services::aggregation::build_aggregated_tree;
use crate::services::detail::build_detail_tree;
use crate::services::element_index::ElementIndex;

/// Keyed memo slots. Each value remembers the snapshot revision it was
/// computed from and is only served back for that same revision.
struct Slots<K, T> {
    inner: RwLock<HashMap<K, (u64, Option<Arc<T>>)>>,
}

impl<K: Eq + Hash + Copy, T> Slots<K, T> {
    fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: K, revision: u64) -> Option<Option<Arc<T>>> {
        let guard = self.inner.read().ok()?;
        match guard.get(&key) {
            Some((stored, val)) if *stored == revision => Some(val.clone()),
            _ => None,
        }
    }

    fn set(&self, key: K, revision: u64, val: Option<Arc<T>>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.insert(key, (revision, val));
        }
    }

    fn retain(&self, mut keep: impl FnMut(&K) -> bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.retain(|k, _| keep(k));
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.clear();
        }
    }

    fn len(&self) -> usize {
        self.inner.read().map(|g| g.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Memoized trees and indexes, keyed by year (and detail selector).
///
/// A year whose snapshot is replaced gets a new revision, so old entries
/// are never returned for it; `invalidate_year` drops them eagerly.
pub struct FinanceCache {
    aggregated: Slots<i32, CategoryTree>,
    detail: Slots<(i32, Rdfi), CategoryTree>,
    indexes: Slots<(i32, Option<Rdfi>), ElementIndex>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for FinanceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FinanceCache {
    pub fn new() -> Self {
        Self {
            aggregated: Slots::new(),
            detail: Slots::new(),
            indexes: Slots::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lookup<K: Eq + Hash + Copy, T>(
        &self,
        slots: &Slots<K, T>,
        key: K,
        revision: u64,
        compute: impl FnOnce() -> Option<T>,
    ) -> Option<Arc<T>> {
        if let Some(cached) = slots.get(key, revision) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let val = compute().map(Arc::new);
        slots.set(key, revision, val.clone());
        val
    }

    pub fn aggregated_tree(&self, snapshot: &LedgerSnapshot) -> Option<Arc<CategoryTree>> {
        self.lookup(&self.aggregated, snapshot.year(), snapshot.revision(), || {
            trace!(year = snapshot.year(), "Computing aggregated tree");
            build_aggregated_tree(snapshot.rows()).unwrap_or_else(|e| {
                error!(year = snapshot.year(), error = %e, "Failed to build aggregated tree");
                None
            })
        })
    }

    pub fn detail_tree(&self, snapshot: &LedgerSnapshot, rdfi: Rdfi) -> Option<Arc<CategoryTree>> {
        let key = (snapshot.year(), rdfi);
        self.lookup(&self.detail, key, snapshot.revision(), || {
            trace!(year = snapshot.year(), rdfi = %rdfi, "Computing detail tree");
            build_detail_tree(snapshot.rows(), rdfi).unwrap_or_else(|e| {
                error!(
                    year = snapshot.year(),
                    rdfi = %rdfi,
                    error = %e,
                    "Failed to build detail tree"
                );
                None
            })
        })
    }

    /// Index of the year's aggregated tree, plus the detail tree of `rdfi`
    /// when one is requested. `None` when the year has no data.
    pub fn element_index(
        &self,
        snapshot: &LedgerSnapshot,
        rdfi: Option<Rdfi>,
    ) -> Option<Arc<ElementIndex>> {
        let key = (snapshot.year(), rdfi);
        if let Some(cached) = self.indexes.get(key, snapshot.revision()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let index = self.aggregated_tree(snapshot).map(|aggregated| {
            let detail = rdfi.and_then(|r| self.detail_tree(snapshot, r));
            Arc::new(ElementIndex::build(aggregated, detail))
        });
        self.indexes.set(key, snapshot.revision(), index.clone());
        index
    }

    pub fn invalidate_year(&self, year: i32) {
        self.aggregated.retain(|k| *k != year);
        self.detail.retain(|(y, _)| *y != year);
        self.indexes.retain(|(y, _)| *y != year);
        debug!(year, "Invalidated cached trees for year");
    }

    pub fn invalidate(&self) {
        self.aggregated.clear();
        self.detail.clear();
        self.indexes.clear();
        debug!("Invalidated all cached trees");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.aggregated.len() + self.detail.len() + self.indexes.len(),
        }
    }
}
