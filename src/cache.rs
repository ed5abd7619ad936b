//! Time-boxed cache for resolved flag URLs
//! Entries expire lazily after the freshness window; nothing is swept in the background.

use crate::clock::{Clock, TokioClock};
use crate::resolver::{FlagResolver, ResolveOptions};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// How long a resolution stays fresh
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    /// `None` records a confirmed absence
    url: Option<String>,
    stored_at: Instant,
}

/// Age of a single cached entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStat {
    pub key: String,
    pub age: Duration,
}

/// Snapshot of the cache contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub entries: Vec<EntryStat>,
}

/// Process-wide store of resolver results, keyed by raw code and options
pub struct FlagCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl Default for FlagCache {
    fn default() -> Self {
        Self::new(Arc::new(TokioClock))
    }
}

impl FlagCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl: FRESHNESS_WINDOW,
        }
    }

    /// Overrides the freshness window
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Composite key of the raw code and the canonical options
    pub fn cache_key(code: &str, options: &ResolveOptions) -> String {
        format!("{}|{}", code, options.canonical())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Live value for a key. The outer `None` means miss; stale entries are removed.
    pub fn get(&self, key: &str) -> Option<Option<String>> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let found = entries.get(key).map(|entry| {
            let live = now.saturating_duration_since(entry.stored_at) < self.ttl;
            (live, entry.url.clone())
        });

        match found {
            Some((true, url)) => Some(url),
            Some((false, _)) => {
                debug!("Cache entry expired: {}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a value with a fresh timestamp, replacing any previous entry
    pub fn put(&self, key: String, url: Option<String>) {
        let stored_at = self.clock.now();
        self.lock().insert(key, CacheEntry { url, stored_at });
    }

    /// Returns the cached resolution, running the resolver on a miss.
    ///
    /// The lock is not held while resolving, so concurrent misses for the same
    /// key each resolve and the last one to finish wins.
    pub async fn get_cached(
        &self,
        resolver: &FlagResolver,
        code: &str,
        options: &ResolveOptions,
    ) -> Option<String> {
        let key = Self::cache_key(code, options);
        if let Some(hit) = self.get(&key) {
            debug!("Cache hit: {}", key);
            return hit;
        }

        debug!("Cache miss: {}", key);
        let url = resolver.resolve(code, options).await;
        self.put(key, url.clone());
        url
    }

    /// Resolves several codes concurrently through the cache, preserving input order
    pub async fn preload(
        &self,
        resolver: &FlagResolver,
        codes: &[String],
        options: &ResolveOptions,
    ) -> Vec<(String, Option<String>)> {
        let lookups = codes.iter().map(|code| async move {
            let url = self.get_cached(resolver, code, options).await;
            (code.clone(), url)
        });
        join_all(lookups).await
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.lock();

        let mut stats: Vec<EntryStat> = entries
            .iter()
            .map(|(key, entry)| EntryStat {
                key: key.clone(),
                age: now.saturating_duration_since(entry.stored_at),
            })
            .collect();
        stats.sort_by(|a, b| a.key.cmp(&b.key));

        CacheStats {
            size: entries.len(),
            entries: stats,
        }
    }
}
