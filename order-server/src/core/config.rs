use std::path::PathBuf;

use crate::auth::{JwtConfig, JwtError};
use crate::message::DEFAULT_CHANNEL_CAPACITY;
use crate::orders::EngineConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | redb file and logs |
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | ENVIRONMENT | development | development / production |
/// | LOG_LEVEL | info | tracing max level |
/// | REQUEST_TIMEOUT_MS | 10000 | per-request timeout |
/// | JWT_SECRET | generated in development | HS256 key, required in production |
/// | JWT_ISSUER / JWT_AUDIENCE | order-server / order-clients | token claims |
/// | STAFF_TOKEN_MINUTES | 60 | staff access token lifetime |
/// | REFRESH_TOKEN_DAYS | 7 | staff refresh token lifetime |
/// | GUEST_CANCEL_GRACE_SECS | 120 | diner self-cancel window |
/// | PREP_BASE_MINUTES / PREP_CAP_MINUTES | 10 / 60 | prep estimate |
/// | BUS_CHANNEL_CAPACITY | 1024 | per-tenant broadcast capacity |
/// | PAYMENT_WEBHOOK_SECRET | unset | HMAC key of payment callbacks |
/// | SEED_FILE | unset | JSON bootstrap file |
///
/// Variables may also come from a `.env` file in the working directory.
///
/// ```ignore
/// WORK_DIR=/srv/orders HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Holds `orders.redb` and `logs/`
    pub work_dir: String,
    pub http_port: u16,
    /// development | production
    pub environment: String,
    pub log_level: String,
    pub request_timeout_ms: u64,
    pub jwt: JwtConfig,
    pub engine: EngineConfig,
    pub bus_channel_capacity: usize,
    /// Payment callbacks are rejected while unset
    pub payment_webhook_secret: Option<String>,
    pub seed_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Fails only when the JWT secret is missing in production or too short.
    pub fn from_env() -> Result<Self, JwtError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let production = environment == "production";
        let defaults = EngineConfig::default();

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 10_000),
            jwt: JwtConfig::from_env(production)?,
            engine: EngineConfig {
                guest_cancel_grace_ms: env_parse::<i64>(
                    "GUEST_CANCEL_GRACE_SECS",
                    defaults.guest_cancel_grace_ms / 1000,
                ) * 1000,
                prep_base_minutes: env_parse("PREP_BASE_MINUTES", defaults.prep_base_minutes),
                prep_cap_minutes: env_parse("PREP_CAP_MINUTES", defaults.prep_cap_minutes),
            },
            bus_channel_capacity: env_parse("BUS_CHANNEL_CAPACITY", DEFAULT_CHANNEL_CAPACITY),
            payment_webhook_secret: std::env::var("PAYMENT_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            seed_file: std::env::var("SEED_FILE").ok().map(PathBuf::from),
            environment,
        })
    }

    /// Development configuration rooted at `work_dir` with a generated JWT key
    ///
    /// Used by tests and local tooling.
    pub fn for_work_dir(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            environment: "development".into(),
            log_level: "info".into(),
            request_timeout_ms: 10_000,
            jwt: JwtConfig::with_generated_secret(),
            engine: EngineConfig::default(),
            bus_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            payment_webhook_secret: None,
            seed_file: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("orders.redb")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
