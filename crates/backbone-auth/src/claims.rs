//! JWT claim structures.
//!
//! Access and refresh tokens carry the same claims; they differ in the
//! [`TokenType`] stamped into `type`, their signing key and their lifetime.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of a token, serialized into the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TokenType {
    #[serde(rename = "Access-Token")]
    Access,
    #[serde(rename = "Refresh-Token")]
    Refresh,
}

/// JWT claims for member tokens.
///
/// # Fields
///
/// - `iss`: Issuing application
/// - `exp`: Token expiration timestamp
/// - `iat`: Token issued-at timestamp
/// - `id`: Member ID
/// - `role_id`: Member role ID
/// - `username`: Member username
/// - `type`: Access or refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Issuer (application name)
    pub iss: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: i64,
    /// Token issued-at timestamp (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Member ID
    pub id: String,
    /// Role ID of the member
    pub role_id: String,
    /// Member username
    pub username: String,
    /// Token kind
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> Claims {
        Claims {
            iss: "backbone".to_string(),
            exp: 1234567890,
            iat: 1234567800,
            id: "member-123".to_string(),
            role_id: "role-1".to_string(),
            username: "ada".to_string(),
            token_type: TokenType::Access,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&claims()).unwrap();
        assert!(serialized.contains(r#""id":"member-123""#));
        assert!(serialized.contains(r#""type":"Access-Token""#));
        assert!(serialized.contains(r#""iss":"backbone""#));
    }

    #[test]
    fn test_claims_deserialize_without_iat() {
        let json = r#"{"iss":"app","exp":9999999999,"id":"m","role_id":"r","username":"u","type":"Refresh-Token"}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.iat, 0);
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_unknown_token_type_rejected() {
        let json = r#"{"iss":"app","exp":1,"id":"m","role_id":"r","username":"u","type":"Id-Token"}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }
}
