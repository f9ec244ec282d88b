//! Fixed-window rate limiting
//!
//! A window for a key starts lazily on its first request and is replaced
//! wholesale once its reset time has passed. Bursts straddling a window
//! boundary are accepted.

mod limiter;
mod memory;
mod redis_store;
mod store;

pub use limiter::{RateLimitDecision, RateLimitRule, RateLimiter};
pub use memory::MemoryRateLimitStore;
pub use redis_store::RedisRateLimitStore;
pub use store::{RateLimitStore, StoreResult, WindowEntry};
