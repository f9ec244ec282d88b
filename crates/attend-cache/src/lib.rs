//! # attend-cache
//!
//! Rate limiting with an in-process or Redis-backed window store.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use attend_cache::{RateLimiter, RateLimitRule, RedisPool, RedisPoolConfig, RedisRateLimitStore};
//! use attend_core::SystemClock;
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let limiter = RateLimiter::new(Arc::new(RedisRateLimitStore::new(pool)), Arc::new(SystemClock));
//!
//! let decision = limiter.check("scan:203.0.113.7", RateLimitRule::SCAN).await;
//! if !decision.allowed {
//!     // respond 429
//! }
//! ```

pub mod pool;
pub mod rate_limit;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export rate limit types
pub use rate_limit::{
    MemoryRateLimitStore, RateLimitDecision, RateLimitRule, RateLimitStore, RateLimiter,
    RedisRateLimitStore, StoreResult, WindowEntry,
};
