//! In-memory TTL cache with an injectable clock.
//!
//! Entries are `{data, timestamp}` pairs keyed by a string. An entry is
//! fresh while `now - timestamp < ttl`. Nothing is ever evicted: the key
//! spaces used by the API (market codes, a single feed key) are small and
//! fixed, and a stale entry is still useful as a last-resort answer.
//!
//! Reads and writes are not coalesced. Two requests that both see an
//! expired entry will both go upstream; the later write wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::warn;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// A cached value and the moment it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub data: V,
    pub timestamp: DateTime<Utc>,
}

/// Key/value store whose entries expire after a fixed TTL.
pub struct TtlCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the entries map, recovering from poison if necessary.
    ///
    /// A poisoned cache only ever holds complete entries, so the data is
    /// still usable.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("TTL cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Whether an entry stored at `timestamp` is still fresh at `now`.
    pub fn is_fresh(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match (now - timestamp).to_std() {
            Ok(age) => age < self.ttl,
            // Stored "in the future" (clock moved backwards): treat as fresh.
            Err(_) => true,
        }
    }

    /// Return the entry for `key` only if it has not expired.
    pub fn get_fresh(&self, key: &str) -> Option<CacheEntry<V>> {
        let now = self.now();
        let entries = self.lock_entries();
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry.timestamp, now))
            .cloned()
    }

    /// Return the entry for `key` regardless of age.
    pub fn get_any(&self, key: &str) -> Option<CacheEntry<V>> {
        self.lock_entries().get(key).cloned()
    }

    /// Store `data` under `key`, stamped with the current time.
    pub fn insert(&self, key: impl Into<String>, data: V) -> CacheEntry<V> {
        let now = self.now();
        self.insert_at(key, data, now)
    }

    /// Store `data` under `key` with an explicit timestamp.
    ///
    /// Handlers stamp entries with the time the request started, not the
    /// time the upstream fetch finished.
    pub fn insert_at(
        &self,
        key: impl Into<String>,
        data: V,
        timestamp: DateTime<Utc>,
    ) -> CacheEntry<V> {
        let entry = CacheEntry { data, timestamp };
        self.lock_entries().insert(key.into(), entry.clone());
        entry
    }

    pub fn remove(&self, key: &str) -> Option<CacheEntry<V>> {
        self.lock_entries().remove(key)
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }
}
