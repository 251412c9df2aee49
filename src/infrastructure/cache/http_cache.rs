use crate::shared::config::CachePartitionConfig;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tokio::sync::RwLock;
use tracing::debug;

/// One cached GET response, keyed by its full request URL.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedHttpEntry {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub cached_at: DateTime<Utc>,
}

impl CachedHttpEntry {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            cached_at: Utc::now(),
        }
    }
}

/// A named cache partition: recency-bounded by the LRU ceiling,
/// freshness-bounded by max age. The two bounds are this partition's own;
/// no other partition is affected by its policy.
struct CachePartition {
    entries: LruCache<String, CachedHttpEntry>,
    max_age: Duration,
}

impl CachePartition {
    fn new(config: &CachePartitionConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            max_age: Duration::seconds(config.max_age_secs as i64),
        }
    }

    fn lookup(&mut self, key: &str, now: DateTime<Utc>) -> Option<CachedHttpEntry> {
        let fresh = match self.entries.get(key) {
            Some(entry) => now.signed_duration_since(entry.cached_at) <= self.max_age,
            None => return None,
        };
        if !fresh {
            // A stale entry is never served; evict it on sight.
            self.entries.pop(key);
            return None;
        }
        self.entries.get(key).cloned()
    }

    fn store(&mut self, key: String, entry: CachedHttpEntry) {
        self.entries.put(key, entry);
    }

    fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| now.signed_duration_since(entry.cached_at) > self.max_age)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            self.entries.pop(key);
        }
        stale.len()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The partitioned response cache behind the interceptor.
pub struct HttpCache {
    partitions: RwLock<HashMap<String, CachePartition>>,
}

impl HttpCache {
    pub fn new(configs: &[CachePartitionConfig]) -> Self {
        let partitions = configs
            .iter()
            .map(|config| (config.name.clone(), CachePartition::new(config)))
            .collect();
        Self {
            partitions: RwLock::new(partitions),
        }
    }

    /// Fresh entry for `key`, or nothing. Serving promotes recency.
    pub async fn lookup(&self, partition: &str, key: &str) -> Option<CachedHttpEntry> {
        let mut partitions = self.partitions.write().await;
        partitions
            .get_mut(partition)?
            .lookup(key, Utc::now())
    }

    /// Creates or overwrites the entry; the partition's LRU ceiling may
    /// evict its least recently used entry to make room. Unknown partition
    /// names are ignored (nothing is cached outside the configured set).
    pub async fn store(&self, partition: &str, key: String, entry: CachedHttpEntry) {
        let mut partitions = self.partitions.write().await;
        match partitions.get_mut(partition) {
            Some(target) => target.store(key, entry),
            None => debug!("Ignoring store into unknown cache partition '{partition}'"),
        }
    }

    /// Drops every expired entry across all partitions; returns how many
    /// were removed.
    pub async fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut partitions = self.partitions.write().await;
        partitions
            .values_mut()
            .map(|partition| partition.prune_expired(now))
            .sum()
    }

    /// Activation-time cleanup: deletes every partition whose name is not
    /// in the expected set. Returns the names that were dropped.
    pub async fn activate(&self, expected: &[&str]) -> Vec<String> {
        let mut partitions = self.partitions.write().await;
        let stale: Vec<String> = partitions
            .keys()
            .filter(|name| !expected.contains(&name.as_str()))
            .cloned()
            .collect();
        for name in &stale {
            partitions.remove(name);
            debug!("Deleted stale cache partition '{name}'");
        }
        stale
    }

    pub async fn partition_names(&self) -> Vec<String> {
        let partitions = self.partitions.read().await;
        let mut names: Vec<String> = partitions.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub async fn entry_count(&self, partition: &str) -> usize {
        let partitions = self.partitions.read().await;
        partitions
            .get(partition)
            .map(CachePartition::len)
            .unwrap_or(0)
    }
}
