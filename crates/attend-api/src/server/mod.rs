//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use attend_cache::{MemoryRateLimitStore, RateLimitStore, RateLimiter, RedisPool, RedisRateLimitStore};
use attend_common::{AppConfig, AppError, LegacyWindow, SessionService, TicketCodec};
use attend_core::value_objects::{CivilCalendar, Clock, SystemClock};
use attend_db::{create_pool, run_migrations, DatabaseConfig, MemoryDatabase};
use attend_service::ServiceContextBuilder;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = create_router(state.clone()).merge(health_routes());
    let router = apply_middleware_with_config(router, &config.cors, config.app.env.is_production());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let builder = context_builder(&config)?;

    let (builder, pool) = match &config.database {
        Some(database) => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&DatabaseConfig::from_app(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");
            (builder.postgres(pool.clone()), Some(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
            (builder.memory(&MemoryDatabase::new()), None)
        }
    };

    let (store, redis_pool): (Arc<dyn RateLimitStore>, _) = match &config.redis {
        Some(redis) => {
            info!("Connecting to Redis...");
            let redis_pool =
                RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
            info!("Redis rate-limit store enabled");
            (Arc::new(RedisRateLimitStore::new(redis_pool.clone())), Some(redis_pool))
        }
        None => (Arc::new(MemoryRateLimitStore::new()), None),
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service_context = builder
        .clock(clock.clone())
        .build()
        .map_err(|e| AppError::ConfigurationMissing(e.to_string()))?;

    let mut state = AppState::new(service_context, config, RateLimiter::new(store, clock));
    if let Some(pool) = pool {
        state = state.with_pool(pool);
    }
    if let Some(redis_pool) = redis_pool {
        state = state.with_redis_pool(redis_pool);
    }
    Ok(state)
}

/// State over fresh in-memory tables and an in-process rate limiter
///
/// Ignores `config.database` and `config.redis`.
pub fn create_memory_app_state(config: AppConfig, clock: Arc<dyn Clock>) -> Result<AppState, AppError> {
    let service_context = context_builder(&config)?
        .memory(&MemoryDatabase::new())
        .clock(clock.clone())
        .build()
        .map_err(|e| AppError::ConfigurationMissing(e.to_string()))?;
    let rate_limiter = RateLimiter::new(Arc::new(MemoryRateLimitStore::new()), clock);

    Ok(AppState::new(service_context, config, rate_limiter))
}

/// Codecs, calendar and export key from configuration
fn context_builder(config: &AppConfig) -> Result<ServiceContextBuilder, AppError> {
    let legacy = LegacyWindow::new(config.session.legacy_cutoff);
    let ticket_codec = TicketCodec::new(&config.ticket.secret, legacy)?;
    let session_service = SessionService::new(
        &config.session.secret,
        config.session.max_age_seconds,
        legacy,
    )?;
    let calendar = CivilCalendar::from_offset_minutes(config.civil.utc_offset_minutes).ok_or_else(|| {
        AppError::ConfigurationMissing(format!(
            "invalid civil UTC offset: {} minutes",
            config.civil.utc_offset_minutes
        ))
    })?;

    Ok(ServiceContextBuilder::new()
        .ticket_codec(ticket_codec)
        .session_service(session_service)
        .calendar(calendar)
        .export_api_key(config.export.api_key.clone()))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::ConfigurationMissing(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config.api.address().parse().map_err(|_| {
        AppError::ConfigurationMissing(format!("invalid listen address {}", config.api.address()))
    })?;
    let sweep_interval = Duration::from_secs(config.rate_limit.sweep_interval_seconds.max(1));

    let state = create_app_state(config).await?;
    let sweeper = state.rate_limiter().spawn_sweeper(sweep_interval);

    let app = create_app(state);
    let result = run_server(app, addr).await;

    sweeper.abort();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
