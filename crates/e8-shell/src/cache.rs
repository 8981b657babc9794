//! Shell Cache
//!
//! Memoizes shells by (norm², regime). A shell is computed the first time it
//! is requested and then served from the cache for the cache's lifetime; a
//! lattice shell never changes, so entries are never invalidated.
//!
//! The map lock is held only long enough to fetch the per-key cell. The cell
//! is a `OnceLock`, so concurrent requests for the same key block on a single
//! computation while requests for other keys proceed.

use crate::shell::{Execution, Shell};
use e8_core::{LatticeResult, NormSq, Regime};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::trace;

/// Cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShellKey {
    pub norm_sq: NormSq,
    pub regime: Regime,
}

/// Counters for a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Keys ever requested
    pub entries: usize,
    /// Shells actually generated
    pub computations: u64,
    /// Requests answered from an already computed shell
    pub hits: u64,
}

/// Memoizing shell store, safe to share across threads
pub struct ShellCache {
    entries: Mutex<HashMap<ShellKey, Arc<OnceLock<Shell>>>>,
    execution: Execution,
    computations: AtomicU64,
    hits: AtomicU64,
}

impl ShellCache {
    /// Create a cache that computes with the default execution mode
    pub fn new() -> Self {
        Self::with_execution(Execution::default())
    }

    /// Create a cache with an explicit execution mode
    pub fn with_execution(execution: Execution) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            execution,
            computations: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Shell for an unvalidated norm
    ///
    /// # Errors
    /// `InvalidArgument` for a negative or oversized norm, before any search.
    pub fn shell(&self, norm_sq: i64, regime: Regime) -> LatticeResult<Shell> {
        let norm_sq = NormSq::try_from(norm_sq)?;
        Ok(self.get_or_compute(norm_sq, regime))
    }

    /// Shell for a validated norm, computing it on first request
    pub fn get_or_compute(&self, norm_sq: NormSq, regime: Regime) -> Shell {
        let key = ShellKey { norm_sq, regime };
        let cell = self.cell(key);

        // Waiting on another thread's computation also counts as a hit
        let mut computed = false;
        let shell = cell
            .get_or_init(|| {
                computed = true;
                self.computations.fetch_add(1, Ordering::Relaxed);
                Shell::compute(norm_sq, regime, self.execution)
            })
            .clone();

        if !computed {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(norm_sq = norm_sq.get(), %regime, "shell cache hit");
        }
        shell
    }

    /// Whether the shell for (norm_sq, regime) has finished computing
    pub fn is_cached(&self, norm_sq: NormSq, regime: Regime) -> bool {
        let key = ShellKey { norm_sq, regime };
        self.lock()
            .get(&key)
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Number of shells generated so far
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.lock().len(),
            computations: self.computations(),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }

    fn cell(&self, key: ShellKey) -> Arc<OnceLock<Shell>> {
        self.lock().entry(key).or_default().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ShellKey, Arc<OnceLock<Shell>>>> {
        // Each map operation is a single insert or lookup, so a poisoned map
        // is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ShellCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShellCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellCache")
            .field("execution", &self.execution)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use e8_core::LatticeError;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_memoized() {
        let cache = ShellCache::with_execution(Execution::Sequential);
        let first = cache.shell(4, Regime::Both).unwrap();
        let second = cache.shell(4, Regime::Both).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.computations(), 1);
        assert_eq!(cache.stats().hits, 1);
        assert!(cache.is_cached(NormSq::from(4u32), Regime::Both));
    }

    #[test]
    fn test_regimes_keyed_separately() {
        let cache = ShellCache::with_execution(Execution::Sequential);
        let both = cache.shell(2, Regime::Both).unwrap();
        assert!(!cache.is_cached(NormSq::from(2u32), Regime::Integer));
        let int = cache.shell(2, Regime::Integer).unwrap();
        let half = cache.shell(2, Regime::HalfInteger).unwrap();
        assert_eq!(cache.computations(), 3);
        assert_eq!(both.len(), int.len() + half.len());
    }

    #[test]
    fn test_invalid_norm_leaves_no_entry() {
        let cache = ShellCache::new();
        assert!(matches!(
            cache.shell(-1, Regime::Both),
            Err(LatticeError::InvalidArgument(_))
        ));
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_concurrent_requests_compute_once() {
        let cache = Arc::new(ShellCache::with_execution(Execution::Sequential));
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.shell(6, Regime::Both).map(|s| s.len())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(6720));
        }
        assert_eq!(cache.computations(), 1);
        // Threads that waited on the computation are hits too
        assert_eq!(cache.stats().hits, 7);
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_cache_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShellCache>();
    }
}
