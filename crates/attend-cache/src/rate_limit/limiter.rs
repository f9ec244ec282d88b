//! Rate limiter front end and presets

use std::sync::Arc;
use std::time::Duration;

use attend_core::value_objects::{Clock, SystemClock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::memory::MemoryRateLimitStore;
use super::store::RateLimitStore;

/// Request budget per window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl RateLimitRule {
    /// Attendance export
    pub const EXPORT: Self = Self::new(5, 60);
    /// Ticket scanning
    pub const SCAN: Self = Self::new(100, 60);
    /// Authentication endpoints
    pub const AUTH: Self = Self::new(10, 60);
    pub const DEFAULT: Self = Self::new(60, 60);

    pub const fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds,
        }
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.window_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

/// Admission decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Window end in epoch milliseconds
    pub reset_at: i64,
}

impl RateLimitDecision {
    /// Window end in epoch seconds, rounded up
    pub fn reset_seconds(&self) -> i64 {
        (self.reset_at + 999).div_euclid(1000)
    }

    /// Seconds until the window resets, at least one
    pub fn retry_after_seconds(&self, now_ms: i64) -> i64 {
        ((self.reset_at - now_ms + 999).div_euclid(1000)).max(1)
    }
}

/// Fixed-window limiter over an injectable store
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Arc::new(MemoryRateLimitStore::new()), Arc::new(SystemClock))
    }
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    /// Count a request for `key` and decide whether it is admitted.
    ///
    /// A store failure admits the request.
    pub async fn check(&self, key: &str, rule: RateLimitRule) -> RateLimitDecision {
        let now_ms = self.now_ms();

        let entry = match self.store.increment(key, rule.window_ms(), now_ms).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, key = %key, "Rate limit store unavailable, admitting request");
                return RateLimitDecision {
                    allowed: true,
                    limit: rule.max_requests,
                    remaining: rule.max_requests,
                    reset_at: now_ms + rule.window_ms(),
                };
            }
        };

        let allowed = entry.count <= rule.max_requests;
        if !allowed {
            debug!(key = %key, count = entry.count, "Rate limit exceeded");
        }

        RateLimitDecision {
            allowed,
            limit: rule.max_requests,
            remaining: rule.max_requests.saturating_sub(entry.count),
            reset_at: entry.reset_at,
        }
    }

    /// Remove expired windows once
    pub async fn sweep(&self) -> usize {
        match self.store.sweep(self.now_ms()).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, "Rate limit sweep failed");
                0
            }
        }
    }

    /// Sweep expired windows every `interval` for the life of the runtime
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter.sweep().await;
                if removed > 0 {
                    debug!(removed, "Swept expired rate limit windows");
                }
            }
        })
    }
}
