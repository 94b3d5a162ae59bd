//! Request authentication.
//!
//! [`AuthMember`] authenticates a request from its bearer token. Member
//! moderation state lives in the shared cache under the `global` namespace;
//! [`AuthMember::status_key`] names the entry for the current member.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use backbone_cache::{CacheKey, Fields, KeyError, derive_key_with_namespace};
use backbone_config::JwtConfig;
use backbone_core::AppError;
use tracing::debug;

use crate::claims::Claims;
use crate::jwt::{bearer_token, extract_claims};

/// Header carrying the client's device identifier.
pub const DEVICE_ID_HEADER: &str = "x-unique-id";

/// Namespace shared by every service for member moderation state.
pub const MEMBER_STATUS_NAMESPACE: &str = "global";

/// Extractor that validates the access token and provides the member's claims.
#[derive(Debug, Clone)]
pub struct AuthMember {
    pub claims: Claims,
    /// Value of the `X-Unique-ID` header, if sent.
    pub device_id: Option<String>,
}

impl AuthMember {
    pub fn id(&self) -> &str {
        &self.claims.id
    }

    pub fn role_id(&self) -> &str {
        &self.claims.role_id
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }

    /// Cache key of this member's status on this device.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EmptyRequiredField`] if the token has no member id.
    pub fn status_key(&self) -> Result<String, KeyError> {
        let key = MemberStatusKey {
            id: self.claims.id.clone(),
            device_id: self.device_id.clone().unwrap_or_default(),
        };
        derive_key_with_namespace(MEMBER_STATUS_NAMESPACE, Some(&key), &[])
    }

    fn from_headers(headers: &HeaderMap, jwt_config: &JwtConfig) -> Result<Self, AppError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Missing authorization header")))?;

        let token = bearer_token(auth_header).ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = extract_claims(token, jwt_config)?;

        let device_id = headers
            .get(DEVICE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        debug!(member.id = %claims.id, "Authenticated member");
        Ok(Self { claims, device_id })
    }
}

impl<S> FromRequestParts<S> for AuthMember
where
    JwtConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jwt_config = JwtConfig::from_ref(state);
        Self::from_headers(&parts.headers, &jwt_config)
    }
}

/// Key of a member's cached moderation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStatusKey {
    pub id: String,
    pub device_id: String,
}

impl CacheKey for MemberStatusKey {
    fn type_name(&self) -> &str {
        "MemberDataKey"
    }

    fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields.value("ID", &self.id).cache("key");
        fields
            .value("DeviceID", &self.device_id)
            .cache("optional")
            .json("device_id");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::generate_access_token;
    use axum::http::{Request, StatusCode};

    fn config() -> JwtConfig {
        JwtConfig {
            access_secret: "middleware-access-key-at-least-32-chars".to_string(),
            refresh_secret: "middleware-refresh-key-at-least-32-chars".to_string(),
            access_expiry_minutes: 5,
            refresh_expiry_hours: 1,
            issuer: "backbone-test".to_string(),
        }
    }

    fn member(id: &str, device_id: Option<&str>) -> AuthMember {
        let config = config();
        let token = generate_access_token(id, "r-1", "ada", &config).unwrap();
        AuthMember {
            claims: extract_claims(&token, &config).unwrap(),
            device_id: device_id.map(str::to_string),
        }
    }

    async fn extract(request: Request<()>) -> Result<AuthMember, AppError> {
        let (mut parts, _) = request.into_parts();
        AuthMember::from_request_parts(&mut parts, &config()).await
    }

    #[test]
    fn test_status_key() {
        assert_eq!(
            member("m-7", Some("dev-1")).status_key().unwrap(),
            "global#MemberDataKey#id:m-7#device_id:dev-1"
        );
        assert_eq!(
            member("m-7", None).status_key().unwrap(),
            "global#MemberDataKey#id:m-7#device_id:"
        );
    }

    #[test]
    fn test_status_key_requires_member_id() {
        assert_eq!(
            member("", None).status_key(),
            Err(KeyError::EmptyRequiredField { field: "id".into() })
        );
    }

    #[tokio::test]
    async fn test_extractor_reads_token_and_device() {
        let token = generate_access_token("m-1", "r-1", "ada", &config()).unwrap();
        let request = Request::builder()
            .header("Authorization", format!("Bearer {token}"))
            .header("X-Unique-ID", "dev-9")
            .body(())
            .unwrap();

        let member = extract(request).await.unwrap();
        assert_eq!(member.id(), "m-1");
        assert_eq!(member.username(), "ada");
        assert_eq!(member.device_id.as_deref(), Some("dev-9"));
    }

    #[tokio::test]
    async fn test_extractor_rejects_missing_or_malformed_header() {
        let missing = extract(Request::builder().body(()).unwrap()).await.unwrap_err();
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

        let basic = Request::builder()
            .header("Authorization", "Basic Zm9vOmJhcg==")
            .body(())
            .unwrap();
        assert_eq!(extract(basic).await.unwrap_err().status, StatusCode::UNAUTHORIZED);
    }
}
