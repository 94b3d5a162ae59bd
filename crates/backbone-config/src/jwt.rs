//! JWT signing configuration.

use std::env;

use crate::service::DEFAULT_APPLICATION_NAME;

/// JWT configuration loaded from environment variables.
///
/// Access and refresh tokens are signed with separate keys.
///
/// # Environment Variables
///
/// - `JWT_ACCESS_SIGNATURE_KEY`: HMAC key for access tokens
/// - `JWT_REFRESH_SIGNATURE_KEY`: HMAC key for refresh tokens
/// - `JWT_ACCESS_EXPIRY_MINUTES`: Access token lifetime (default: `60`)
/// - `JWT_REFRESH_EXPIRY_HOURS`: Refresh token lifetime (default: `720`)
/// - `APPLICATION_NAME`: Token issuer (default: `backbone`)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_expiry_minutes: i64,
    pub refresh_expiry_hours: i64,
    pub issuer: String,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            access_secret: env::var("JWT_ACCESS_SIGNATURE_KEY").unwrap_or_default(),
            refresh_secret: env::var("JWT_REFRESH_SIGNATURE_KEY").unwrap_or_default(),
            access_expiry_minutes: env::var("JWT_ACCESS_EXPIRY_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            refresh_expiry_hours: env::var("JWT_REFRESH_EXPIRY_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720), // 30 days
            issuer: env::var("APPLICATION_NAME")
                .ok()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string()),
        }
    }

    /// Access token lifetime in seconds.
    #[must_use]
    pub fn access_expiry_seconds(&self) -> i64 {
        self.access_expiry_minutes * 60
    }

    /// Refresh token lifetime in seconds.
    #[must_use]
    pub fn refresh_expiry_seconds(&self) -> i64 {
        self.refresh_expiry_hours * 3600
    }
}
