//! Service identity configuration.
//!
//! A service's name scopes every key it writes to the shared cache, and its
//! application name is stamped into the tokens it issues.

use std::env;

/// Application name used when `APPLICATION_NAME` is not set.
pub const DEFAULT_APPLICATION_NAME: &str = "backbone";

/// Identity of the running service.
///
/// # Environment Variables
///
/// - `SERVICE_NAME`: Cache namespace of the service (default: empty)
/// - `APPLICATION_NAME`: Issuer stamped into tokens (default: `backbone`)
/// - `ENV`: Deployment environment (default: `development`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Namespace owning this service's keys in the shared cache.
    pub name: String,

    /// Application name, used as the JWT issuer.
    pub application_name: String,

    /// Deployment environment, e.g. `production`.
    pub environment: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// An unset `SERVICE_NAME` is kept empty rather than defaulted: cache key
    /// derivation refuses to run without an explicit namespace.
    pub fn from_env() -> Self {
        Self {
            name: env::var("SERVICE_NAME").unwrap_or_default(),
            application_name: env::var("APPLICATION_NAME")
                .ok()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.into()),
            environment: env::var("ENV").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Create a configuration for a named service with default settings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the service runs in production.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            application_name: DEFAULT_APPLICATION_NAME.into(),
            environment: "development".into(),
        }
    }
}
