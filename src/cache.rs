//! Caching layer for transcript resolution
//!
//! Transcript models are resolved once per protein id and shared for the
//! rest of the run. The cache is an explicit object handed to the resolver
//! rather than process-global state.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ferro_paralogues::cache::TranscriptCache;
//! use ferro_paralogues::reference::{Exon, Strand, TranscriptModel};
//!
//! let cache = TranscriptCache::new();
//! let tx = TranscriptModel::new("ENST1", "1", Strand::Plus, vec![Exon::new(1, 1, 30)]);
//! cache.insert("ENSP1", Arc::new(tx));
//! assert!(cache.get("ENSP1").is_some());
//! println!("Cache stats: {:?}", cache.stats());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::FerroError;
use crate::reference::transcript::TranscriptModel;

/// Statistics for cache usage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of items currently in cache
    pub size: usize,
}

impl CacheStats {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    /// Calculate miss rate as a percentage
    pub fn miss_rate(&self) -> f64 {
        100.0 - self.hit_rate()
    }
}

/// Thread-safe write-once cache of transcript models keyed by protein id
///
/// Entries are never evicted or replaced. When two threads race to insert
/// the same key, the first value stays and both callers get it back; the
/// values are value-equal so the outcome does not depend on the winner.
#[derive(Debug, Default)]
pub struct TranscriptCache {
    entries: RwLock<HashMap<String, Arc<TranscriptModel>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TranscriptCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a transcript from the cache
    ///
    /// Statistics counters use `Relaxed` ordering; counts may be slightly
    /// inconsistent under heavy concurrent access.
    pub fn get(&self, protein_id: &str) -> Option<Arc<TranscriptModel>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(protein_id) {
            Some(tx) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(tx))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a transcript unless the key is already present
    ///
    /// Returns the cached value, which is the existing one on a lost race.
    pub fn insert(&self, protein_id: &str, transcript: Arc<TranscriptModel>) -> Arc<TranscriptModel> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            entries
                .entry(protein_id.to_string())
                .or_insert(transcript),
        )
    }

    /// Get a transcript, computing and caching it on a miss
    ///
    /// `f` runs without holding the lock, so concurrent misses on the same
    /// key may each call it; only the first result is kept. Errors and
    /// `None` results are not cached.
    pub fn get_or_try_insert_with<F>(
        &self,
        protein_id: &str,
        f: F,
    ) -> Result<Option<Arc<TranscriptModel>>, FerroError>
    where
        F: FnOnce() -> Result<Option<TranscriptModel>, FerroError>,
    {
        if let Some(tx) = self.get(protein_id) {
            return Ok(Some(tx));
        }
        match f()? {
            Some(tx) => Ok(Some(self.insert(protein_id, Arc::new(tx)))),
            None => Ok(None),
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.len(),
        }
    }

    /// Get the number of items in the cache
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::transcript::{Exon, Strand};
    use std::thread;

    fn tx(id: &str) -> TranscriptModel {
        TranscriptModel::new(id, "1", Strand::Plus, vec![Exon::new(1, 1, 30)])
    }

    #[test]
    fn test_cache_basic() {
        let cache = TranscriptCache::new();
        assert!(cache.is_empty());
        cache.insert("P1", Arc::new(tx("T1")));
        assert_eq!(cache.get("P1").unwrap().id, "T1");
        assert!(cache.get("P2").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_is_write_once() {
        let cache = TranscriptCache::new();
        let first = cache.insert("P1", Arc::new(tx("T1")));
        let second = cache.insert("P1", Arc::new(tx("T2")));
        assert_eq!(first.id, "T1");
        assert_eq!(second.id, "T1");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_stats() {
        let cache = TranscriptCache::new();
        cache.insert("P1", Arc::new(tx("T1")));
        cache.get("P1");
        cache.get("P1");
        cache.get("P2");
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_cache_stats_zero_total() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 100.0);
    }

    #[test]
    fn test_get_or_try_insert_with() {
        let cache = TranscriptCache::new();
        let mut calls = 0;
        let got = cache
            .get_or_try_insert_with("P1", || {
                calls += 1;
                Ok(Some(tx("T1")))
            })
            .unwrap();
        assert_eq!(got.unwrap().id, "T1");

        let got = cache
            .get_or_try_insert_with("P1", || panic!("should be cached"))
            .unwrap();
        assert_eq!(got.unwrap().id, "T1");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_get_or_try_insert_with_does_not_cache_misses() {
        let cache = TranscriptCache::new();
        assert!(cache.get_or_try_insert_with("P1", || Ok(None)).unwrap().is_none());
        assert!(cache
            .get_or_try_insert_with("P1", || Err(FerroError::Provider { msg: "down".into() }))
            .is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_first_insert() {
        let cache = Arc::new(TranscriptCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.insert("P1", Arc::new(tx("T1"))))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.len(), 1);
    }
}
