//! Redis cache store.
//!
//! Async Redis operations over a shared connection manager, with JSON
//! conveniences for callers that work with a single default TTL.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, instrument};

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::store::{CacheStore, CacheStoreExt};

/// Keys fetched per `SCAN` round trip.
const SCAN_BATCH: usize = 100;

/// Redis cache client with connection pooling.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Creates a new Redis cache client.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `default_ttl` - Time-to-live used by [`set`](Self::set)
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if connection fails.
    pub async fn new(redis_url: &str, default_ttl: Duration) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn, default_ttl })
    }

    /// Connects using [`CacheConfig`].
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if connection fails.
    pub async fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        Self::new(&config.redis_url, config.default_ttl()).await
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Gets a cached value by key.
    ///
    /// Returns `None` if the key doesn't exist, the read fails or the payload
    /// doesn't deserialize; failures are logged.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        match self.get_json(key).await {
            Ok(value) => value,
            Err(e) => {
                error!(cache.key = %key, error = %e, "Failed to read cached value");
                None
            }
        }
    }

    /// Sets a cached value with the default TTL.
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.set_json(key, value, self.default_ttl).await
    }

    /// Invalidates (deletes) a cached key.
    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.delete(&[key.to_string()]).await?;
        debug!(cache.key = %key, "Cache invalidated");
        Ok(())
    }

    /// Invalidates all keys matching a pattern.
    ///
    /// # Warning
    ///
    /// Uses SCAN which is safe for production, but may be slow with many keys.
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let keys = self.scan(pattern).await?;
        let deleted = self.delete(&keys).await?;

        debug!(cache.pattern = %pattern, cache.deleted = %deleted, "Pattern invalidation complete");

        Ok(deleted)
    }
}

/// Whole milliseconds for `PX`/`PEXPIRE`, rounded up so a non-zero TTL never becomes 0.
fn millis(ttl: Duration) -> u64 {
    let rounded = ttl.as_nanos().div_ceil(1_000_000);
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

#[async_trait]
impl CacheStore for RedisCache {
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value = conn.get::<_, Option<String>>(key).await?;

        match value {
            Some(_) => debug!(cache.key = %key, "Cache hit"),
            None => debug!(cache.key = %key, "Cache miss"),
        }

        Ok(value)
    }

    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if !ttl.is_zero() {
            cmd.arg("PX").arg(millis(ttl));
        }
        let _: () = cmd.query_async(&mut conn).await?;

        debug!(cache.key = %key, cache.ttl_ms = millis(ttl), "Cache set");

        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "EXISTS"))]
    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.exists::<_, bool>(key).await?)
    }

    #[instrument(skip(self), fields(cache.operation = "EXPIRE"))]
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        let updated: bool = if ttl.is_zero() {
            // PERSIST reports 0 for keys without expiry too.
            let existed = conn.exists::<_, bool>(key).await?;
            let _: () = redis::cmd("PERSIST").arg(key).query_async(&mut conn).await?;
            existed
        } else {
            redis::cmd("PEXPIRE")
                .arg(key)
                .arg(millis(ttl))
                .query_async(&mut conn)
                .await?
        };
        Ok(updated)
    }

    #[instrument(skip(self, keys), fields(cache.operation = "DEL", cache.keys = keys.len()))]
    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        Ok(conn.del::<_, u64>(keys).await?)
    }

    #[instrument(skip(self), fields(cache.operation = "SCAN"))]
    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut found = Vec::new();

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            found.extend(keys);

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        // SCAN may return a key more than once.
        found.sort();
        found.dedup();

        Ok(found)
    }

    #[instrument(skip(self), fields(cache.operation = "TTL"))]
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        let mut conn = self.conn.clone();
        let ttl: i64 = redis::cmd("PTTL").arg(key).query_async(&mut conn).await?;

        // -1 (no expiry) or -2 (doesn't exist)
        Ok(u64::try_from(ttl).ok().map(Duration::from_millis))
    }
}
