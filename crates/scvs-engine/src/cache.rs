//! # Verdict Cache and Single-Flight Group
//!
//! Verification verdicts are cached per certificate number with a short
//! TTL. The cache is an availability measure for hot numbers (a QR code
//! being scanned repeatedly), not a source of truth: revocation invalidates
//! the entry immediately, and expiry forces recomputation.
//!
//! The [`FlightGroup`] collapses concurrent cache misses for the same
//! number into one recomputation: the first caller acquires the key's
//! flight lock and computes; the rest wait, then re-check the cache. This
//! also keeps the audit trail honest, since only the caller that actually
//! recomputed records a verification event.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::verify::Verdict;

/// Verdict cache keyed by certificate number.
///
/// Implementations are synchronous: lookups must be cheap enough to run
/// inline on the verification path.
pub trait VerdictCache: Send + Sync {
    /// Fetch a live (unexpired) verdict.
    fn get(&self, number: &str) -> Option<Verdict>;

    /// Store a verdict, restarting its TTL.
    fn set(&self, number: &str, verdict: Verdict);

    /// Drop the entry for a number, if present.
    fn invalidate(&self, number: &str);
}

/// In-memory TTL cache.
#[derive(Debug)]
pub struct MemoryVerdictCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    verdict: Verdict,
    expires_at: Instant,
}

impl MemoryVerdictCache {
    /// Create a cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl VerdictCache for MemoryVerdictCache {
    fn get(&self, number: &str) -> Option<Verdict> {
        let entries = self.entries.read();
        let entry = entries.get(number)?;
        // Expired entries are left for the next `set` to sweep; the read
        // path never takes the write lock.
        if Instant::now() < entry.expires_at {
            Some(entry.verdict.clone())
        } else {
            None
        }
    }

    fn set(&self, number: &str, verdict: Verdict) {
        let now = Instant::now();
        let entry = CacheEntry {
            verdict,
            expires_at: now + self.ttl,
        };
        let mut entries = self.entries.write();
        // Sweep dead entries while the write lock is held anyway, so the
        // map never grows past the set of live numbers plus this one.
        entries.retain(|_, e| now < e.expires_at);
        entries.insert(number.to_owned(), entry);
    }

    fn invalidate(&self, number: &str) {
        self.entries.write().remove(number);
    }
}

/// Collapses concurrent recomputations for the same key.
#[derive(Debug, Default, Clone)]
pub struct FlightGroup {
    entries: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl FlightGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the flight lock for `key`, waiting if another caller holds
    /// it. The returned guard releases the lock on drop and removes the
    /// key's entry once no caller needs it.
    pub async fn acquire(&self, key: &str) -> FlightGuard {
        let slot = {
            let mut entries = self.entries.lock();
            Arc::clone(
                entries
                    .entry(key.to_owned())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        let guard = Arc::clone(&slot).lock_owned().await;
        FlightGuard {
            entries: Arc::clone(&self.entries),
            key: key.to_owned(),
            slot,
            _guard: guard,
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Held for the duration of one recomputation.
pub struct FlightGuard {
    entries: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
    key: String,
    slot: Arc<AsyncMutex<()>>,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let mut entries = self.entries.lock();
        // Three strong refs mean nobody else is waiting: the map's, ours,
        // and the owned guard's. A fourth ref is a waiter (or an acquirer
        // between clone and lock), so the entry stays.
        if Arc::strong_count(&self.slot) == 3 {
            entries.remove(&self.key);
        }
    }
}
