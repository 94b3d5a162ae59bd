//! # Backbone Cache
//!
//! Deterministic cache keys and the stores they are used with.
//!
//! This crate provides:
//! - Cache key derivation from annotated records ([`CacheKey`], [`derive_key`])
//! - A process-wide or injected key namespace
//! - The [`CacheStore`] abstraction with Redis and in-memory backends
//! - Cache configuration from environment variables
//!
//! A key has the shape `<namespace>#<TypeName>[#prefix...][#name:value...]`.
//! Fields take part through their `cache` annotation (`key`, `optional`,
//! `dive`, `nodive`) and are named by their `json` annotation.
//!
//! # Example
//!
//! ```
//! use backbone_cache::{CacheKey, Fields, derive_key_with_namespace};
//!
//! struct PostKey {
//!     id: u64,
//!     locale: String,
//!     body: String,
//! }
//!
//! impl CacheKey for PostKey {
//!     fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
//!         fields.value("ID", &self.id).cache("key");
//!         fields.value("Locale", &self.locale).cache("optional");
//!         fields.value("Body", &self.body);
//!     }
//! }
//!
//! let post = PostKey { id: 7, locale: "en".into(), body: "...".into() };
//! let key = derive_key_with_namespace("feed", Some(&post), &["v2"]).unwrap();
//! assert_eq!(key, "feed#PostKey#v2#id:7#locale:en");
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod memory;
pub mod namespace;
pub mod record;
pub mod redis;
pub mod store;
pub mod tag;
pub mod value;

pub use config::CacheConfig;
pub use error::{CacheError, KeyError};
pub use key::{KeyDeriver, derive_key, derive_key_with_namespace};
pub use memory::MemoryCache;
pub use namespace::{namespace, reset_namespace, set_namespace};
pub use record::{CacheKey, Field, Fields, Fragment};
pub use redis::RedisCache;
pub use store::{CacheStore, CacheStoreExt};
pub use value::KeyValue;
