//! Storage seam for rate-limit windows

use async_trait::async_trait;

use crate::pool::RedisPoolError;

/// State of one key's current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    pub count: u32,
    /// Window end in epoch milliseconds
    pub reset_at: i64,
}

impl WindowEntry {
    /// A window is replaced only once `reset_at` is strictly in the past
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.reset_at < now_ms
    }

    /// Count one request at `now_ms` against this window or a fresh one
    pub fn hit(current: Option<Self>, window_ms: i64, now_ms: i64) -> Self {
        match current {
            Some(entry) if !entry.is_expired(now_ms) => Self {
                count: entry.count.saturating_add(1),
                reset_at: entry.reset_at,
            },
            _ => Self {
                count: 1,
                reset_at: now_ms + window_ms,
            },
        }
    }
}

pub type StoreResult<T> = Result<T, RedisPoolError>;

/// Where rate-limit windows live.
///
/// The in-process store suits a single instance; the Redis store shares
/// windows between instances.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<WindowEntry>>;

    async fn set(&self, key: &str, entry: WindowEntry) -> StoreResult<()>;

    /// Drop expired windows, returning how many were removed
    async fn sweep(&self, now_ms: i64) -> StoreResult<usize>;

    /// Count one request. Stores override this with an atomic version.
    async fn increment(&self, key: &str, window_ms: i64, now_ms: i64) -> StoreResult<WindowEntry> {
        let entry = WindowEntry::hit(self.get(key).await?, window_ms, now_ms);
        self.set(key, entry).await?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_starts_window() {
        let entry = WindowEntry::hit(None, 60_000, 1_000);
        assert_eq!(entry, WindowEntry { count: 1, reset_at: 61_000 });
    }

    #[test]
    fn test_hit_within_window() {
        let current = WindowEntry { count: 3, reset_at: 61_000 };
        assert_eq!(WindowEntry::hit(Some(current), 60_000, 61_000).count, 4);
    }

    #[test]
    fn test_hit_after_window() {
        let current = WindowEntry { count: 3, reset_at: 61_000 };
        let entry = WindowEntry::hit(Some(current), 60_000, 61_001);
        assert_eq!(entry, WindowEntry { count: 1, reset_at: 121_001 });
    }
}
