//! JWT (JSON Web Token) utilities for member authentication.
//!
//! Tokens are HS256-signed. Access tokens use `JWT_ACCESS_SIGNATURE_KEY`,
//! refresh tokens `JWT_REFRESH_SIGNATURE_KEY`. Extraction also checks the
//! `type` claim.
//!
//! # Example
//!
//! ```ignore
//! use backbone_auth::{extract_client, generate_access_token};
//! use backbone_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = generate_access_token("member-1", "role-2", "ada", &config)?;
//!
//! let claims = extract_client(&format!("Bearer {token}"), &config)?;
//! assert_eq!(claims.username, "ada");
//! ```

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value};
use tracing::debug;

use backbone_config::JwtConfig;
use backbone_core::AppError;

use crate::claims::{Claims, TokenType};

const BEARER_PREFIX: &str = "Bearer ";

fn validation() -> Validation {
    Validation::new(Algorithm::HS256)
}

fn generate(
    member_id: &str,
    role_id: &str,
    username: &str,
    token_type: TokenType,
    secret: &str,
    lifetime_seconds: i64,
    issuer: &str,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        iss: issuer.to_string(),
        exp: now + lifetime_seconds,
        iat: now,
        id: member_id.to_string(),
        role_id: role_id.to_string(),
        username: username.to_string(),
        token_type,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("token signing error: {e}")))
}

/// Creates a short-lived access token for a member.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn generate_access_token(
    member_id: &str,
    role_id: &str,
    username: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    generate(
        member_id,
        role_id,
        username,
        TokenType::Access,
        &jwt_config.access_secret,
        jwt_config.access_expiry_seconds(),
        &jwt_config.issuer,
    )
}

/// Creates a long-lived refresh token for a member.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn generate_refresh_token(
    member_id: &str,
    role_id: &str,
    username: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    generate(
        member_id,
        role_id,
        username,
        TokenType::Refresh,
        &jwt_config.refresh_secret,
        jwt_config.refresh_expiry_seconds(),
        &jwt_config.issuer,
    )
}

fn extract(token: &str, secret: &str, expected: TokenType) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!(error = %e, "Rejected token");
        AppError::unauthorized(anyhow::anyhow!("Invalid or expired token"))
    })?;

    if claims.token_type != expected {
        return Err(AppError::unauthorized(anyhow::anyhow!("Unexpected token type")));
    }

    Ok(claims)
}

/// Verifies an access token and returns its claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired or it is not an access token.
pub fn extract_claims(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    extract(token, &jwt_config.access_secret, TokenType::Access)
}

/// Verifies a refresh token and returns its claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired or it is not a refresh token.
pub fn extract_refresh_claims(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    extract(token, &jwt_config.refresh_secret, TokenType::Refresh)
}

/// Verifies an access token and returns every claim it carries, including
/// ones [`Claims`] does not model.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid or the token
/// has expired.
pub fn extract_raw_claims(token: &str, jwt_config: &JwtConfig) -> Result<Map<String, Value>, AppError> {
    decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(jwt_config.access_secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid or expired token")))
}

/// Token part of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verifies the access token in an `Authorization` header value.
///
/// A value without the `Bearer ` prefix is treated as a bare token.
///
/// # Errors
///
/// Same as [`extract_claims`].
pub fn extract_client(authorization: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let token = bearer_token(authorization).unwrap_or(authorization.trim());
    extract_claims(token, jwt_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test-access-key-at-least-32-characters".to_string(),
            refresh_secret: "test-refresh-key-at-least-32-characters".to_string(),
            access_expiry_minutes: 60,
            refresh_expiry_hours: 720,
            issuer: "backbone-test".to_string(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = get_test_jwt_config();
        let token = generate_access_token("m-1", "r-2", "ada", &config).unwrap();
        let claims = extract_claims(&token, &config).unwrap();

        assert_eq!(claims.id, "m-1");
        assert_eq!(claims.role_id, "r-2");
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.iss, "backbone-test");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_refresh_token_uses_its_own_key() {
        let config = get_test_jwt_config();
        let refresh = generate_refresh_token("m-1", "r-2", "ada", &config).unwrap();

        let claims = extract_refresh_claims(&refresh, &config).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.exp - claims.iat, 720 * 3600);

        let err = extract_claims(&refresh, &config).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let mut config = get_test_jwt_config();
        config.refresh_secret = config.access_secret.clone();
        let access = generate_access_token("m-1", "r-2", "ada", &config).unwrap();

        assert!(extract_refresh_claims(&access, &config).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = get_test_jwt_config();
        let token = generate_access_token("m-1", "r-2", "ada", &config).unwrap();

        let mut other = get_test_jwt_config();
        other.access_secret = "different-secret-key-at-least-32-chars".to_string();
        assert!(extract_claims(&token, &other).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = get_test_jwt_config();
        config.access_expiry_minutes = -10;
        let token = generate_access_token("m-1", "r-2", "ada", &config).unwrap();

        assert!(extract_claims(&token, &config).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let config = get_test_jwt_config();
        assert!(extract_claims("invalid-token", &config).is_err());
        assert!(extract_raw_claims("invalid-token", &config).is_err());
    }

    #[test]
    fn test_raw_claims() {
        let config = get_test_jwt_config();
        let token = generate_access_token("m-1", "r-2", "ada", &config).unwrap();
        let raw = extract_raw_claims(&token, &config).unwrap();

        assert_eq!(raw["username"], "ada");
        assert_eq!(raw["type"], "Access-Token");
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_extract_client_accepts_both_forms() {
        let config = get_test_jwt_config();
        let token = generate_access_token("m-1", "r-2", "ada", &config).unwrap();

        let with_prefix = extract_client(&format!("Bearer {token}"), &config).unwrap();
        let bare = extract_client(&token, &config).unwrap();
        assert_eq!(with_prefix, bare);
    }
}
