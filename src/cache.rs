// Memoization of assembled diffs.
//
// One mutex guards the entry map and the in-flight table; each in-flight
// key owns a condvar. The first caller for a key becomes the leader,
// computes outside the lock, publishes the entry, and wakes the waiters.
// Waiters loop: a fresh entry satisfies them, a missing one (the leader
// failed) makes the next caller the new leader, so failures are never
// cached. Entries expire after the configured TTL and are recomputed on
// the next access; capacity pressure evicts expired entries first, then
// the oldest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::assemble::DiffResult;
use crate::engine::DiffError;

/// Identity of one cached diff: the file, the two revisions, and the
/// preference fingerprint they were diffed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub file_id: String,
    pub revision_a: String,
    pub revision_b: String,
    pub prefs_fingerprint: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_entries: 1024,
        }
    }
}

struct Entry {
    value: Arc<DiffResult>,
    inserted_at: Instant,
}

struct Inner {
    entries: HashMap<CacheKey, Entry>,
    in_flight: HashMap<CacheKey, Arc<Condvar>>,
}

/// Construct once at startup and share by reference; all interior state
/// lives behind the lock.
pub struct DiffCache {
    config: CacheConfig,
    inner: Mutex<Inner>,
    computations: AtomicU64,
}

impl Default for DiffCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl DiffCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            }),
            computations: AtomicU64::new(0),
        }
    }

    /// How many computations have actually run (cache misses that led).
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Return the cached diff for `key`, computing it at most once across
    /// concurrent callers. A failed computation is returned to its leader
    /// and not cached; one waiter takes over and retries.
    pub fn get_or_compute<F>(&self, key: &CacheKey, compute: F) -> Result<Arc<DiffResult>, DiffError>
    where
        F: FnOnce() -> Result<DiffResult, DiffError>,
    {
        let mut inner = self.inner.lock();
        let slot = loop {
            if let Some(entry) = inner.entries.get(key) {
                if entry.inserted_at.elapsed() < self.config.ttl {
                    log::debug!("diff cache hit for {}@{}", key.file_id, key.revision_b);
                    return Ok(Arc::clone(&entry.value));
                }
            }
            // Stale entries are dropped and recomputed on access.
            inner.entries.remove(key);

            let in_flight = inner.in_flight.get(key).map(Arc::clone);
            match in_flight {
                Some(slot) => slot.wait(&mut inner),
                None => {
                    let slot = Arc::new(Condvar::new());
                    inner.in_flight.insert(key.clone(), Arc::clone(&slot));
                    break slot;
                }
            }
        };
        drop(inner);

        self.computations.fetch_add(1, Ordering::Relaxed);
        let result = compute();

        let mut inner = self.inner.lock();
        inner.in_flight.remove(key);
        let outcome = match result {
            Ok(value) => {
                let value = Arc::new(value);
                Self::make_room(&mut inner, &self.config);
                inner.entries.insert(
                    key.clone(),
                    Entry {
                        value: Arc::clone(&value),
                        inserted_at: Instant::now(),
                    },
                );
                Ok(value)
            }
            Err(e) => {
                log::debug!(
                    "diff computation failed for {}@{}..{}: {e}",
                    key.file_id,
                    key.revision_a,
                    key.revision_b
                );
                Err(e)
            }
        };
        slot.notify_all();
        outcome
    }

    fn make_room(inner: &mut Inner, config: &CacheConfig) {
        if inner.entries.len() < config.max_entries {
            return;
        }
        inner
            .entries
            .retain(|_, entry| entry.inserted_at.elapsed() < config.ttl);
        while inner.entries.len() >= config.max_entries {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => inner.entries.remove(&key),
                None => break,
            };
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
