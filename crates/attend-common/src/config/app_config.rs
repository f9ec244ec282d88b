//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    /// `None` selects the in-memory store (development only)
    pub database: Option<DatabaseConfig>,
    /// `Some` moves rate-limit state to Redis
    pub redis: Option<RedisConfig>,
    pub session: SessionConfig,
    pub ticket: TicketConfig,
    pub export: ExportConfig,
    pub rate_limit: RateLimitConfig,
    pub civil: CivilConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub max_age_seconds: i64,
    /// Legacy unsigned session tokens are accepted until this instant
    pub legacy_cutoff: Option<DateTime<Utc>>,
}

/// Ticket token configuration
#[derive(Clone)]
pub struct TicketConfig {
    pub secret: String,
}

/// Attendance export configuration
#[derive(Clone, Default)]
pub struct ExportConfig {
    /// `None` disables the export endpoints
    pub api_key: Option<String>,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub sweep_interval_seconds: u64,
    /// Peers whose `X-Forwarded-For` / `X-Real-IP` headers are believed
    pub trusted_proxies: Vec<IpAddr>,
}

/// Civil calendar configuration
#[derive(Debug, Clone)]
pub struct CivilConfig {
    pub utc_offset_minutes: i32,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

macro_rules! redacted_debug {
    ($ty:ty, $name:literal, [$($field:ident),*]) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct($name)
                    $(.field(stringify!($field), &self.$field))*
                    .finish_non_exhaustive()
            }
        }
    };
}

redacted_debug!(SessionConfig, "SessionConfig", [max_age_seconds, legacy_cutoff]);
redacted_debug!(TicketConfig, "TicketConfig", []);
redacted_debug!(ExportConfig, "ExportConfig", []);

// Default value functions
fn default_app_name() -> String {
    "attend-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_session_max_age() -> i64 {
    604_800 // 7 days
}

fn default_sweep_interval() -> u64 {
    300 // 5 minutes
}

fn default_utc_offset_minutes() -> i32 {
    540 // UTC+09:00
}

const DEV_SESSION_SECRET: &str = "dev-session-secret-do-not-use-in-production";
const DEV_QR_SECRET: &str = "dev-qr-secret-do-not-use-in-production";

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_env = match get("APP_ENV") {
            Some(s) => Environment::parse(&s).ok_or(ConfigError::InvalidValue("APP_ENV", s))?,
            None => Environment::default(),
        };
        let production = app_env.is_production();

        let secret = |key: &'static str, fallback: &str| -> Result<String, ConfigError> {
            match get(key) {
                Some(value) => Ok(value),
                None if production => Err(ConfigError::MissingVar(key)),
                None => {
                    warn!(var = key, "Secret not set, using development fallback");
                    Ok(fallback.to_string())
                }
            }
        };

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&get, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            }),
            None if production => return Err(ConfigError::MissingVar("DATABASE_URL")),
            None => None,
        };

        let legacy_cutoff = get("LEGACY_TOKEN_CUTOFF")
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| ConfigError::InvalidValue("LEGACY_TOKEN_CUTOFF", s))
            })
            .transpose()?;

        let utc_offset_minutes = parse_or(&get, "CIVIL_UTC_OFFSET_MINUTES", default_utc_offset_minutes)?;
        if utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::InvalidValue(
                "CIVIL_UTC_OFFSET_MINUTES",
                utc_offset_minutes.to_string(),
            ));
        }

        let trusted_proxies = get("TRUSTED_PROXIES")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|hop| {
                        hop.parse::<IpAddr>()
                            .map_err(|_| ConfigError::InvalidValue("TRUSTED_PROXIES", hop.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let export_key = get("EXPORT_API_KEY");
        if export_key.is_none() {
            warn!("EXPORT_API_KEY not set, attendance export is disabled");
        }

        Ok(Self {
            app: AppSettings {
                name: get("APP_NAME").unwrap_or_else(default_app_name),
                env: app_env,
            },
            api: ServerConfig {
                host: get("API_HOST").unwrap_or_else(default_host),
                port: parse_or(&get, "API_PORT", default_port)?,
            },
            database,
            redis: get("REDIS_URL").map(|url| -> Result<RedisConfig, ConfigError> {
                Ok(RedisConfig {
                    url,
                    max_connections: parse_or(&get, "REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
                })
            }).transpose()?,
            session: SessionConfig {
                secret: secret("SESSION_SECRET", DEV_SESSION_SECRET)?,
                max_age_seconds: parse_or(&get, "SESSION_MAX_AGE_SECONDS", default_session_max_age)?,
                legacy_cutoff,
            },
            ticket: TicketConfig {
                secret: secret("QR_SECRET", DEV_QR_SECRET)?,
            },
            export: ExportConfig { api_key: export_key },
            rate_limit: RateLimitConfig {
                sweep_interval_seconds: parse_or(&get, "RATE_LIMIT_SWEEP_SECONDS", default_sweep_interval)?,
                trusted_proxies,
            },
            civil: CivilConfig { utc_offset_minutes },
            cors: CorsConfig {
                allowed_origins: get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

fn parse_or<T, G, D>(get: &G, key: &'static str, default: D) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
    D: FnOnce() -> T,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
