//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CivilConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    ExportConfig, RateLimitConfig, RedisConfig, ServerConfig, SessionConfig, TicketConfig,
};
