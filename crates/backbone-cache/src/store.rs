//! Cache store abstraction.
//!
//! [`CacheStore`] is the narrow, object-safe surface services program
//! against: string payloads in, string payloads out. [`CacheStoreExt`] adds
//! the JSON and bulk-invalidation helpers on top of any store.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::CacheError;

/// Key-value store holding derived cache keys.
///
/// A `ttl` of [`Duration::ZERO`] stores the entry without expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the raw payload stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Writes `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Resets the expiry of `key`. Returns `false` when the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CacheError>;

    /// Deletes `keys`, returning how many existed.
    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError>;

    /// Lists keys matching a Redis glob pattern.
    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Remaining lifetime of `key`; `None` when missing or persistent.
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError>;
}

/// JSON and invalidation helpers available on every [`CacheStore`].
#[async_trait]
pub trait CacheStoreExt: CacheStore {
    /// Reads and deserializes the value stored under `key`.
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Like [`get_json`](Self::get_json), and pushes the expiry of a hit out to `ttl`.
    async fn get_json_and_touch<T>(&self, key: &str, ttl: Duration) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned + Send,
    {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw)?;
        self.expire(key, ttl).await?;
        Ok(Some(value))
    }

    /// Serializes `value` as JSON and stores it under `key`.
    async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, ttl).await
    }

    /// Deletes every key containing `fragment`, e.g. a namespace plus type name.
    async fn purge(&self, fragment: &str) -> Result<u64, CacheError> {
        let pattern = format!("*{fragment}*");
        let keys = self.scan(&pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let deleted = self.delete(&keys).await?;
        debug!(cache.pattern = %pattern, cache.deleted = deleted, "Purged cache keys");
        Ok(deleted)
    }
}

impl<S: CacheStore + ?Sized> CacheStoreExt for S {}
