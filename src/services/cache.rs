//! In-memory TTL cache for monitoring snapshots

use crate::bootstrap::{ManagedService, ServiceHealthReport};
use crate::monitoring::SnapshotStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// How often expired entries are swept
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Cache entry with metadata
#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    created_at: Instant,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: serde_json::Value, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Key/value cache whose entries expire after a per-entry TTL
#[derive(Debug)]
pub struct SnapshotCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    purge_interval: Duration,
    purge_task: Mutex<Option<JoinHandle<()>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: Arc<AtomicU64>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_PURGE_INTERVAL)
    }
}

impl SnapshotCache {
    pub fn new(purge_interval: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            purge_interval,
            purge_task: Mutex::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Store a value for `ttl`
    pub fn put(&self, key: impl Into<String>, value: serde_json::Value, ttl: Duration) {
        let key = key.into();
        debug!("Caching '{}' for {:?}", key, ttl);
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    /// Get a live value; expired entries are removed on access
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired && self.entries.remove_if(key, |_, e| e.is_expired()).is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Age of a live entry
    pub fn age(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.created_at.elapsed())
    }

    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.remove(key).map(|(_, e)| e.value)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        purge(&self.entries, &self.evictions)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

fn purge(entries: &DashMap<String, CacheEntry>, evictions: &AtomicU64) -> usize {
    let mut removed = 0usize;
    entries.retain(|_, entry| {
        if entry.is_expired() {
            removed += 1;
            false
        } else {
            true
        }
    });

    if removed > 0 {
        evictions.fetch_add(removed as u64, Ordering::Relaxed);
        debug!("Purged {} expired cache entries", removed);
    }
    removed
}

#[async_trait]
impl SnapshotStore for SnapshotCache {
    async fn put(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
        SnapshotCache::put(self, key, value, ttl);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(SnapshotCache::get(self, key))
    }
}

#[async_trait]
impl ManagedService for SnapshotCache {
    async fn initialize(&self) -> Result<()> {
        let mut task = self.purge_task.lock();
        if task.is_some() {
            return Ok(());
        }

        let entries = self.entries.clone();
        let evictions = self.evictions.clone();
        let period = self.purge_interval;
        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                purge(&entries, &evictions);
            }
        }));

        info!("Snapshot cache started");
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        if let Some(task) = self.purge_task.lock().take() {
            task.abort();
        }
        self.entries.clear();
        info!("Snapshot cache stopped");
        Ok(())
    }

    async fn health_check(&self) -> Result<ServiceHealthReport> {
        Ok(ServiceHealthReport::operational()
            .with_metadata("entries", serde_json::json!(self.entries.len())))
    }
}
