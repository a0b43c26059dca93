//! Owner service configuration

use std::time::Duration;

use chrono_tz::Tz;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Restaurant persistence backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = BoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("STORE_BACKEND must be postgres or memory, got '{other}'").into()),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL (required for the postgres backend)
    pub database_url: Option<String>,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret shared with the identity service
    pub jwt_secret: String,
    /// Allowed CORS origin for the owner dashboard
    pub client_url: String,
    /// Business timezone the opening hours are expressed in
    pub timezone: Tz,
    /// Schedule tick period
    pub schedule_interval: Duration,
    pub store_backend: StoreBackend,
    /// Object storage bucket; uploads answer 503 when unset
    pub s3_bucket: Option<String>,
    pub aws_region: String,
    /// Upload size limit in bytes
    pub max_file_size: usize,
    pub presigned_url_expiry: Duration,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Parse an optional env var, failing on a present but invalid value
    fn parse_var<T>(name: &str, default: T) -> Result<T, BoxError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match std::env::var(name) {
            Ok(v) if !v.trim().is_empty() => v
                .trim()
                .parse()
                .map_err(|e| format!("Invalid {name} '{v}': {e}").into()),
            _ => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let store_backend: StoreBackend = match std::env::var("STORE_BACKEND") {
            Ok(v) if !v.is_empty() => v.parse()?,
            _ => StoreBackend::Postgres,
        };
        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set".into());
        }

        let timezone: Tz = Self::parse_var("TIMEZONE", chrono_tz::Asia::Kolkata)?;

        let interval_secs: u64 = Self::parse_var("SCHEDULE_INTERVAL_SECS", 60)?;
        if interval_secs == 0 {
            return Err("SCHEDULE_INTERVAL_SECS must be greater than zero".into());
        }

        Ok(Self {
            database_url,
            http_port: Self::parse_var("HTTP_PORT", 5000)?,
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            client_url: std::env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            timezone,
            schedule_interval: Duration::from_secs(interval_secs),
            store_backend,
            s3_bucket: std::env::var("S3_BUCKET_NAME").ok().filter(|s| !s.is_empty()),
            aws_region: std::env::var("AWS_REGION").unwrap_or_else(|_| "ap-south-1".into()),
            max_file_size: Self::parse_var("MAX_FILE_SIZE", 5 * 1024 * 1024)?,
            presigned_url_expiry: Duration::from_secs(Self::parse_var(
                "S3_PRESIGNED_URL_EXPIRY",
                3600,
            )?),
        })
    }
}
