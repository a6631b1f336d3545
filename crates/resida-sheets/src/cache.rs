//! Process-local TTL cache fronting row store reads.
//!
//! A single process-wide key → (value, expiry) mapping. Keys are namespaced
//! by table and operation kind so that a write to one table can invalidate
//! every cached read for that table without touching the others.
//!
//! The cache is deliberately process-local shared mutable state: entries are
//! populated on miss, invalidated on write, and expire passively on the next
//! access (no timer). In a multi-process deployment the instances diverge;
//! deployments that need coherence must replace this with a shared external
//! cache or drop caching entirely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::record::Record;

/// Tracing target for cache operations.
const TRACING_TARGET: &str = "resida_sheets::cache";

/// A value cached on behalf of the row store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    /// The header row of a table.
    Headers(Vec<String>),
    /// Every data record of a table.
    Records(Vec<Record>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: CachedValue,
    expires_at: Instant,
}

/// Shared TTL cache for row store reads.
///
/// `Clone` is cheap; all clones share the same underlying map. A miss is
/// indistinguishable from a stored empty value by design, so callers treat
/// "no entry" and "0-length list" identically and simply re-fetch.
#[derive(Debug, Clone, Default)]
pub struct SheetCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl SheetCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the namespaced cache key for a table and operation kind.
    pub fn key(table: &str, kind: &str) -> String {
        format!("{table}::{kind}")
    }

    /// Returns the cached value for `key` if present and not expired.
    ///
    /// Expired entries are removed on access; there is no background sweeper.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key` with an absolute expiry of now + `ttl`.
    pub fn put(&self, key: impl Into<String>, value: CachedValue, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.into(), entry);
    }

    /// Removes every entry belonging to `table`.
    ///
    /// Called after any write to the table so the very next read observes
    /// backend state at least as fresh as that write. Reads before any write
    /// may be stale up to the TTL.
    pub fn invalidate(&self, table: &str) {
        let prefix = format!("{table}::");
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&prefix));

        tracing::debug!(
            target: TRACING_TARGET,
            table = table,
            removed = before - entries.len(),
            "cache invalidated"
        );
    }
}
