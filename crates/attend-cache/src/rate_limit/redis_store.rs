//! Redis-backed rate-limit store for multi-instance deployments

use async_trait::async_trait;
use redis::{AsyncCommands, Script};

use super::store::{RateLimitStore, StoreResult, WindowEntry};
use crate::pool::RedisPool;

/// Key prefix for rate-limit windows
const RATE_LIMIT_PREFIX: &str = "ratelimit:";

/// INCR with the window TTL set on first use; returns count and remaining TTL in ms
const INCREMENT_SCRIPT: &str = r"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('PTTL', KEYS[1])
return {count, ttl}
";

/// Windows stored as counters whose TTL is the remaining window
#[derive(Debug, Clone)]
pub struct RedisRateLimitStore {
    pool: RedisPool,
}

impl RedisRateLimitStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(key: &str) -> String {
        format!("{RATE_LIMIT_PREFIX}{key}")
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn get(&self, key: &str) -> StoreResult<Option<WindowEntry>> {
        let mut conn = self.pool.get().await?;
        let redis_key = Self::key(key);

        let count: Option<u32> = conn.get(&redis_key).await?;
        let ttl_ms: i64 = conn.pttl(&redis_key).await?;

        Ok(match count {
            Some(count) if ttl_ms >= 0 => Some(WindowEntry {
                count,
                reset_at: chrono::Utc::now().timestamp_millis() + ttl_ms,
            }),
            _ => None,
        })
    }

    async fn set(&self, key: &str, entry: WindowEntry) -> StoreResult<()> {
        let ttl_ms = entry.reset_at - chrono::Utc::now().timestamp_millis();
        if ttl_ms <= 0 {
            return Ok(());
        }

        let mut conn = self.pool.get().await?;
        redis::cmd("SET")
            .arg(Self::key(key))
            .arg(entry.count)
            .arg("PX")
            .arg(ttl_ms)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    /// Redis expires windows on its own
    async fn sweep(&self, _now_ms: i64) -> StoreResult<usize> {
        Ok(0)
    }

    async fn increment(&self, key: &str, window_ms: i64, now_ms: i64) -> StoreResult<WindowEntry> {
        let mut conn = self.pool.get().await?;
        let (count, ttl_ms): (u32, i64) = Script::new(INCREMENT_SCRIPT)
            .key(Self::key(key))
            .arg(window_ms)
            .invoke_async(&mut conn)
            .await?;

        Ok(WindowEntry {
            count,
            reset_at: now_ms + ttl_ms.max(0),
        })
    }
}
