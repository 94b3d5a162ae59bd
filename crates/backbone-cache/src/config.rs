//! Redis cache configuration.
//!
//! This module provides configuration for Redis connection settings
//! loaded from environment variables.

use std::env;
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 6379;
const DEFAULT_TTL_SECONDS: u64 = 300;

/// Redis cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL; takes precedence over the parts below
/// - `REDIS_HOST`: Redis host (default: `127.0.0.1`)
/// - `REDIS_PORT`: Redis port (default: `6379`)
/// - `REDIS_PASSWORD`: Redis password (default: none)
/// - `CACHE_TTL_SECONDS`: Default TTL for cached items in seconds (default: `300`)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Redis connection URL.
    pub redis_url: String,

    /// Default time-to-live for cached items in seconds.
    pub default_ttl_seconds: u64,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let redis_url = env::var("REDIS_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| {
                let host = env::var("REDIS_HOST")
                    .ok()
                    .filter(|host| !host.is_empty())
                    .unwrap_or_else(|| DEFAULT_HOST.into());
                let port = env::var("REDIS_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PORT);
                let password = env::var("REDIS_PASSWORD").ok();
                redis_url(&host, port, password.as_deref())
            });

        Self {
            redis_url,
            default_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECONDS),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: redis_url(DEFAULT_HOST, DEFAULT_PORT, None),
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

/// Builds a `redis://` URL from its parts.
///
/// # Example
///
/// ```
/// use backbone_cache::config::redis_url;
///
/// assert_eq!(redis_url("cache", 6380, Some("s3cret")), "redis://:s3cret@cache:6380");
/// assert_eq!(redis_url("cache", 6379, None), "redis://cache:6379");
/// ```
pub fn redis_url(host: &str, port: u16, password: Option<&str>) -> String {
    match password.filter(|p| !p.is_empty()) {
        Some(password) => format!("redis://:{password}@{host}:{port}"),
        None => format!("redis://{host}:{port}"),
    }
}
