//! # Backbone Config
//!
//! Configuration types shared by Backbone services.
//!
//! Every structure is loaded from environment variables and falls back to a
//! default when a variable is missing or cannot be parsed:
//!
//! - [`service`]: service identity (cache namespace, application name, environment)
//! - [`jwt`]: JWT signing keys and token lifetimes
//!
//! # Example
//!
//! ```ignore
//! use backbone_config::{JwtConfig, ServiceConfig};
//!
//! let service = ServiceConfig::from_env();
//! let jwt = JwtConfig::from_env();
//! ```

pub mod jwt;
pub mod service;

// Re-export commonly used types at crate root
pub use jwt::JwtConfig;
pub use service::ServiceConfig;
