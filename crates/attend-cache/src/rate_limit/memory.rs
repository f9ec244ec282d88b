//! In-process rate-limit store

use async_trait::async_trait;
use dashmap::DashMap;

use super::store::{RateLimitStore, StoreResult, WindowEntry};

/// Concurrency-safe in-process store backed by a sharded map
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    windows: DashMap<String, WindowEntry>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn get(&self, key: &str) -> StoreResult<Option<WindowEntry>> {
        Ok(self.windows.get(key).map(|e| *e))
    }

    async fn set(&self, key: &str, entry: WindowEntry) -> StoreResult<()> {
        self.windows.insert(key.to_string(), entry);
        Ok(())
    }

    async fn sweep(&self, now_ms: i64) -> StoreResult<usize> {
        let before = self.windows.len();
        self.windows.retain(|_, entry| !entry.is_expired(now_ms));
        Ok(before.saturating_sub(self.windows.len()))
    }

    async fn increment(&self, key: &str, window_ms: i64, now_ms: i64) -> StoreResult<WindowEntry> {
        // The shard lock is held for the read-modify-write
        let mut slot = self
            .windows
            .entry(key.to_string())
            .or_insert(WindowEntry { count: 0, reset_at: now_ms + window_ms });

        let next = WindowEntry::hit(Some(*slot), window_ms, now_ms);
        *slot = next;
        Ok(next)
    }
}
