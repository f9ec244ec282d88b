//! # attend-common
//!
//! Shared utilities including configuration, error handling, token codecs, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    is_signed_ticket, LegacyWindow, SessionClaims, SessionService, TicketCodec, TokenFormat,
    VerifiedToken,
};
pub use config::{
    AppConfig, AppSettings, CivilConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    ExportConfig, RateLimitConfig, RedisConfig, ServerConfig, SessionConfig, TicketConfig,
};
pub use error::AppError;
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
