//! Memoization of resolved access modes.
//!
//! Entries are keyed by (resource identifier, agent) and hold the resolver's
//! [`AuthorizedModes`]. The cache is optional: the service resolves directly
//! when none is configured.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::model::AuthorizedModes;

/// Configuration for the access mode cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_entries: usize,
    /// Time-to-live for cached outcomes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(600), // 10 minutes
        }
    }
}

impl CacheConfig {
    /// Create a production cache configuration.
    pub fn production() -> Self {
        Self {
            max_entries: 50_000,
            ttl: Duration::from_secs(60),
        }
    }

    /// Create a development cache configuration.
    pub fn development() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(5),
        }
    }

    /// Disable caching.
    pub fn disabled() -> Self {
        Self {
            max_entries: 0,
            ttl: Duration::ZERO,
        }
    }

    /// True if this configuration stores nothing.
    pub fn is_disabled(&self) -> bool {
        self.max_entries == 0 || self.ttl.is_zero()
    }
}

/// Cache key for one (resource, agent) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    identifier: String,
    agent: String,
}

impl CacheKey {
    /// Separator between the identifier and the agent.
    pub const SEPARATOR: &'static str = "||";

    /// Creates a key.
    pub fn new(identifier: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            agent: agent.into(),
        }
    }

    /// The resource identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The agent identifier.
    pub fn agent(&self) -> &str {
        &self.agent
    }
}

/// Flat string form: `{len(identifier)}:{identifier}||{agent}`.
///
/// The length prefix pins where the identifier ends, so identifiers or
/// agents containing `||` cannot produce the same string.
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{}{}",
            self.identifier.len(),
            self.identifier,
            Self::SEPARATOR,
            self.agent
        )
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries currently in cache.
    pub size: usize,
    /// Number of evictions due to capacity or age.
    pub evictions: u64,
}

/// A store for resolved access modes.
///
/// Implementations must be safe to share between threads. Values handed out
/// by `get` are owned copies.
pub trait ModeCache: Send + Sync + fmt::Debug {
    /// Returns the cached outcome for `key`, if present and fresh.
    fn get(&self, key: &CacheKey) -> Option<AuthorizedModes>;

    /// Stores an outcome.
    fn insert(&self, key: CacheKey, value: AuthorizedModes);

    /// Drops every entry for the given resource identifier.
    fn invalidate(&self, identifier: &str);

    /// Drops all entries.
    fn clear(&self);

    /// Returns cache statistics.
    fn stats(&self) -> CacheStats;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: AuthorizedModes,
    created_at: Instant,
}

impl CacheEntry {
    fn new(value: AuthorizedModes) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Bounded, time-expiring [`ModeCache`].
///
/// Entries older than the TTL are never returned. Over capacity, the least
/// recently used entry is evicted. Recency order is the map's insertion order:
/// a hit moves the entry to the back.
#[derive(Debug)]
pub struct LruTtlCache {
    config: CacheConfig,
    entries: Mutex<IndexMap<CacheKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl LruTtlCache {
    /// Create a new cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(IndexMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// The cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn evict_expired(&self, entries: &mut IndexMap<CacheKey, CacheEntry>) {
        let ttl = self.config.ttl;
        let before = entries.len();
        entries.retain(|_, v| !v.is_expired(ttl));
        let evicted = before - entries.len();
        if evicted > 0 {
            self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
        }
    }
}

impl Default for LruTtlCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl ModeCache for LruTtlCache {
    fn get(&self, key: &CacheKey) -> Option<AuthorizedModes> {
        if self.config.is_disabled() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let ttl = self.config.ttl;
        let mut entries = self.entries.lock();
        let lookup = entries
            .get_full(key)
            .map(|(index, _, entry)| (index, entry.is_expired(ttl), entry.value.clone()));

        match lookup {
            Some((index, false, value)) => {
                let last = entries.len() - 1;
                entries.move_index(index, last);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Some((index, true, _)) => {
                entries.shift_remove_index(index);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn insert(&self, key: CacheKey, value: AuthorizedModes) {
        if self.config.is_disabled() {
            return;
        }

        let mut entries = self.entries.lock();
        entries.shift_remove(&key);

        if entries.len() >= self.config.max_entries {
            self.evict_expired(&mut entries);
        }

        while entries.len() >= self.config.max_entries {
            if entries.shift_remove_index(0).is_none() {
                break;
            }
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        entries.insert(key, CacheEntry::new(value));
    }

    fn invalidate(&self, identifier: &str) {
        self.entries
            .lock()
            .retain(|key, _| key.identifier() != identifier);
    }

    fn clear(&self) {
        self.entries.lock().clear();
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.entries.lock().len(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
