//! In-process cache store.
//!
//! Mirrors the subset of Redis semantics [`CacheStore`] relies on, so
//! single-node services and tests can run without a Redis instance. Entries
//! live in a `moka` cache with a per-entry expiry; expired entries are never
//! returned and are evicted by the cache's own housekeeping.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tracing::instrument;

use crate::error::CacheError;
use crate::store::CacheStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: deadline(ttl),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

fn deadline(ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        None
    } else {
        Instant::now().checked_add(ttl)
    }
}

/// Expires each entry at the deadline it was written with.
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, created_at: Instant) -> Option<Duration> {
        entry.expires_at.map(|at| at.saturating_duration_since(created_at))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.expires_at.map(|at| at.saturating_duration_since(updated_at))
    }
}

/// Cache store backed by a shared in-memory `moka` cache.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, Entry>,
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Unbounded store; entries leave only by expiry or deletion.
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().expire_after(EntryExpiry).build(),
        }
    }

    /// Store holding at most `max_entries`, evicting the least useful ones beyond that.
    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_entries)
                .expire_after(EntryExpiry)
                .build(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    async fn live(&self, key: &str) -> Option<Entry> {
        let now = Instant::now();
        self.entries
            .get(key)
            .await
            .filter(|entry| entry.is_live(now))
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.live(key).await.map(|entry| entry.value))
    }

    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .insert(key.to_string(), Entry::new(value.to_string(), ttl))
            .await;
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "EXISTS"))]
    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.live(key).await.is_some())
    }

    #[instrument(skip(self), fields(cache.operation = "EXPIRE"))]
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CacheError> {
        let Some(mut entry) = self.live(key).await else {
            return Ok(false);
        };
        entry.expires_at = deadline(ttl);
        self.entries.insert(key.to_string(), entry).await;
        Ok(true)
    }

    #[instrument(skip(self, keys), fields(cache.operation = "DEL", cache.keys = keys.len()))]
    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        let now = Instant::now();
        let mut deleted = 0;
        for key in keys {
            if self
                .entries
                .remove(key.as_str())
                .await
                .is_some_and(|entry| entry.is_live(now))
            {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    #[instrument(skip(self), fields(cache.operation = "SCAN"))]
    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| entry.is_live(now) && glob_match(pattern.as_bytes(), key.as_bytes()))
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    #[instrument(skip(self), fields(cache.operation = "TTL"))]
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        let now = Instant::now();
        Ok(self
            .live(key)
            .await
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }
}

/// Redis `KEYS`/`SCAN` glob matching.
///
/// Supports `*`, `?`, `[abc]`, `[^a]`, `[a-z]` and `\` escapes.
pub(crate) fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    let Some((&head, rest)) = pattern.split_first() else {
        return text.is_empty();
    };

    match head {
        b'*' => {
            let rest = trim_stars(rest);
            if rest.is_empty() {
                return true;
            }
            (0..=text.len()).any(|skip| glob_match(rest, &text[skip..]))
        }
        b'?' => !text.is_empty() && glob_match(rest, &text[1..]),
        b'[' => {
            let Some((&c, tail)) = text.split_first() else {
                return false;
            };
            let (matched, after) = match_class(rest, c);
            matched && glob_match(after, tail)
        }
        b'\\' if !rest.is_empty() => {
            text.first() == Some(&rest[0]) && glob_match(&rest[1..], &text[1..])
        }
        literal => text.first() == Some(&literal) && glob_match(rest, &text[1..]),
    }
}

fn trim_stars(mut pattern: &[u8]) -> &[u8] {
    while let Some((b'*', rest)) = pattern.split_first() {
        pattern = rest;
    }
    pattern
}

/// Matches `c` against a bracket class whose opening `[` is already consumed.
///
/// Returns whether it matched and the pattern after the closing `]`. An
/// unterminated class runs to the end of the pattern.
fn match_class(mut class: &[u8], c: u8) -> (bool, &[u8]) {
    let negate = class.first() == Some(&b'^');
    if negate {
        class = &class[1..];
    }

    let mut matched = false;
    loop {
        match class {
            [] => break,
            [b']', rest @ ..] => {
                class = rest;
                break;
            }
            [b'\\', escaped, rest @ ..] => {
                matched |= *escaped == c;
                class = rest;
            }
            [low, b'-', high, rest @ ..] if *high != b']' => {
                let (low, high) = if low <= high { (*low, *high) } else { (*high, *low) };
                matched |= (low..=high).contains(&c);
                class = rest;
            }
            [single, rest @ ..] => {
                matched |= *single == c;
                class = rest;
            }
        }
    }

    (matched != negate, class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CacheStoreExt;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: i32,
        name: String,
    }

    fn matches(pattern: &str, text: &str) -> bool {
        glob_match(pattern.as_bytes(), text.as_bytes())
    }

    #[test]
    fn test_glob_literals_and_wildcards() {
        assert!(matches("svc#User#id:1", "svc#User#id:1"));
        assert!(!matches("svc#User#id:1", "svc#User#id:12"));
        assert!(matches("*User*", "svc#User#id:1"));
        assert!(matches("svc#*", "svc#"));
        assert!(!matches("svc#*", "other#User"));
        assert!(matches("id:?", "id:7"));
        assert!(!matches("id:?", "id:"));
        assert!(matches("**", ""));
    }

    #[test]
    fn test_glob_classes() {
        assert!(matches("h[ae]llo", "hello"));
        assert!(matches("h[ae]llo", "hallo"));
        assert!(!matches("h[ae]llo", "hillo"));
        assert!(matches("h[^e]llo", "hallo"));
        assert!(!matches("h[^e]llo", "hello"));
        assert!(matches("id:[0-9]", "id:5"));
        assert!(!matches("id:[0-9]", "id:x"));
    }

    #[test]
    fn test_glob_escapes() {
        assert!(matches(r"a\*b", "a*b"));
        assert!(!matches(r"a\*b", "axb"));
        assert!(matches(r"[\]]", "]"));
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new();
        cache.set("k", "v", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.exists("k").await.unwrap());
        assert_eq!(cache.len(), 1);

        let deleted = cache.delete(&["k".into(), "missing".into()]).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(cache.get("k").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = MemoryCache::new();
        cache.set("short", "v", Duration::from_millis(10)).await.unwrap();
        cache.set("forever", "v", Duration::ZERO).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(cache.get("short").await.unwrap().is_none());
        assert!(!cache.expire("short", Duration::from_secs(1)).await.unwrap());
        assert_eq!(cache.get("forever").await.unwrap().as_deref(), Some("v"));
        assert_eq!(cache.ttl("forever").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expire_and_ttl() {
        let cache = MemoryCache::new();
        cache.set("k", "v", Duration::ZERO).await.unwrap();
        assert!(cache.expire("k", Duration::from_secs(120)).await.unwrap());

        let ttl = cache.ttl("k").await.unwrap().unwrap();
        assert!(ttl > Duration::from_secs(100) && ttl <= Duration::from_secs(120));
        assert_eq!(cache.ttl("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache = MemoryCache::new();
        let data = TestData {
            id: 1,
            name: "test".to_string(),
        };

        cache
            .set_json("test:key", &data, Duration::from_secs(1))
            .await
            .unwrap();
        let retrieved: Option<TestData> = cache
            .get_json_and_touch("test:key", Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(retrieved, Some(data));
        assert!(cache.ttl("test:key").await.unwrap().unwrap() > Duration::from_secs(1));

        let missing: Option<TestData> = cache.get_json("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_json_reports_corrupt_payload() {
        let cache = MemoryCache::new();
        cache.set("bad", "not json", Duration::ZERO).await.unwrap();
        let result: Result<Option<TestData>, _> = cache.get_json("bad").await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_scan_and_purge() {
        let cache = MemoryCache::new();
        for key in ["svc#Post#id:1", "svc#Post#id:2", "svc#User#id:1"] {
            cache.set(key, "{}", Duration::ZERO).await.unwrap();
        }

        let posts = cache.scan("svc#Post#*").await.unwrap();
        assert_eq!(posts, vec!["svc#Post#id:1", "svc#Post#id:2"]);

        assert_eq!(cache.purge("svc#Post").await.unwrap(), 2);
        assert_eq!(cache.purge("svc#Post").await.unwrap(), 0);
        assert_eq!(cache.scan("*").await.unwrap(), vec!["svc#User#id:1"]);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let cache = MemoryCache::new();
        for i in 0..500 {
            cache
                .set(&format!("short:{i}"), "v", Duration::from_millis(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.set("forever", "v", Duration::ZERO).await.unwrap();
        assert_eq!(cache.len(), 1);

        // Eviction runs on the cache's housekeeping schedule.
        for _ in 0..50 {
            cache.entries.run_pending_tasks().await;
            if cache.entries.entry_count() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(cache.entries.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_capacity_bounds_entries() {
        let cache = MemoryCache::with_capacity(10);
        for i in 0..100 {
            cache.set(&format!("k:{i}"), "v", Duration::ZERO).await.unwrap();
        }
        cache.entries.run_pending_tasks().await;
        assert!(cache.entries.entry_count() <= 10);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new();
        cache.set("k", "v", Duration::ZERO).await.unwrap();
        cache.clear().await;
        assert!(cache.is_empty());
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_is_object_safe() {
        let store: std::sync::Arc<dyn CacheStore> = std::sync::Arc::new(MemoryCache::new());
        store.set("k", "\"v\"", Duration::ZERO).await.unwrap();
        let value: Option<String> = store.get_json("k").await.unwrap();
        assert_eq!(value.as_deref(), Some("v"));
    }
}
