//! Application state
//!
//! Holds the shared state for the Axum application including the service
//! context, the rate limiter, and the backends checked for readiness.

use std::sync::Arc;

use attend_cache::{RateLimiter, RedisPool};
use attend_common::AppConfig;
use attend_db::PgPool;
use attend_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    rate_limiter: RateLimiter,
    /// `None` when running on the in-memory store
    pool: Option<PgPool>,
    /// `None` when rate-limit windows are kept in process
    redis_pool: Option<RedisPool>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, config: AppConfig, rate_limiter: RateLimiter) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            rate_limiter,
            pool: None,
            redis_pool: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_redis_pool(mut self, redis_pool: RedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }

    /// Whether cookies are marked `Secure`
    pub fn secure_cookies(&self) -> bool {
        self.config.app.env.is_production()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("rate_limiter", &self.rate_limiter)
            .field("pool", &self.pool.is_some())
            .field("redis_pool", &self.redis_pool.is_some())
            .finish()
    }
}
