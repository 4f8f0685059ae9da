use std::env;

use document_intake_core::limiter::{LimiterConfig, TimeUnit};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// Steady-state admission permits per time unit.
    pub limiter_request_limit: u32,
    /// Limiter warm-up span, in time units.
    pub limiter_warmup_period: u32,
    /// Unit of the limiter rate and warm-up span.
    pub limiter_time_unit: TimeUnit,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3030".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            database_url: env::var("DATABASE_URL")?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("DB_MAX_CONNECTIONS must be a valid u32"),
            db_min_connections: env::var("DB_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("DB_MIN_CONNECTIONS must be a valid u32"),
            limiter_request_limit: env::var("CONCURRENCY_LIMITER_REQUEST_LIMIT")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("CONCURRENCY_LIMITER_REQUEST_LIMIT must be a positive integer"),
            limiter_warmup_period: env::var("CONCURRENCY_LIMITER_WARMUP_PERIOD")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .expect("CONCURRENCY_LIMITER_WARMUP_PERIOD must be a non-negative integer"),
            limiter_time_unit: env::var("CONCURRENCY_LIMITER_TIME_UNIT")
                .unwrap_or_else(|_| "SECONDS".to_string())
                .parse()
                .expect("CONCURRENCY_LIMITER_TIME_UNIT must name a time unit"),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Admission limiter settings as the core crate expects them.
    pub fn limiter(&self) -> LimiterConfig {
        LimiterConfig {
            request_limit: self.limiter_request_limit,
            warmup_period: self.limiter_warmup_period,
            time_unit: self.limiter_time_unit,
        }
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
