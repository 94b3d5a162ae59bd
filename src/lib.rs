//! # Backbone
//!
//! Shared building blocks for backend services: deterministic cache keys,
//! cache stores, HTTP response helpers, pagination and member
//! authentication.
//!
//! The workspace is split by concern:
//!
//! | Crate | Provides |
//! |-------|----------|
//! | `backbone-cache` | Cache key derivation, [`CacheStore`](cache::CacheStore), Redis and in-memory stores |
//! | `backbone-core` | [`AppError`](rest::AppError), the response envelope, pagination |
//! | `backbone-auth` | JWT generation and verification, the [`AuthMember`](auth::AuthMember) extractor |
//! | `backbone-config` | Environment-driven configuration |
//!
//! This crate re-exports all of them and sets up logging.
//!
//! ## Cache keys
//!
//! ```
//! use backbone::cache::{CacheKey, Fields, derive_key_with_namespace};
//!
//! struct UserKey {
//!     id: String,
//! }
//!
//! impl CacheKey for UserKey {
//!     fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
//!         fields.value("ID", &self.id).cache("key");
//!     }
//! }
//!
//! let key = derive_key_with_namespace("global", Some(&UserKey { id: "42".into() }), &[]).unwrap();
//! assert_eq!(key, "global#UserKey#id:42");
//! ```
//!
//! ## Service setup
//!
//! ```ignore
//! use backbone::config::ServiceConfig;
//!
//! let service = ServiceConfig::from_env();
//! backbone::logging::init_logging(&service);
//! backbone::cache::set_namespace(service.name.as_str());
//! ```

pub mod logging;

pub use backbone_auth as auth;
pub use backbone_cache as cache;
pub use backbone_config as config;
pub use backbone_core as rest;

pub use backbone_cache::{CacheKey, Fields, KeyError, derive_key, derive_key_with_namespace};
pub use backbone_core::AppError;
