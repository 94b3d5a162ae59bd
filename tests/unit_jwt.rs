mod common;

use backbone::auth::{
    TokenType, extract_claims, extract_client, extract_refresh_claims, generate_access_token,
    generate_refresh_token,
};
use common::{bearer, test_jwt_config};

#[test]
fn test_generate_access_token_success() {
    let jwt_config = test_jwt_config();
    let token = generate_access_token("member-1", "role-1", "ada", &jwt_config).unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[test]
fn test_extract_claims_success() {
    let jwt_config = test_jwt_config();
    let token = generate_access_token("member-1", "role-1", "ada", &jwt_config).unwrap();

    let claims = extract_claims(&token, &jwt_config).unwrap();
    assert_eq!(claims.id, "member-1");
    assert_eq!(claims.role_id, "role-1");
    assert_eq!(claims.username, "ada");
    assert_eq!(claims.iss, jwt_config.issuer);
    assert_eq!(claims.token_type, TokenType::Access);
}

#[test]
fn test_extract_claims_invalid_token() {
    let jwt_config = test_jwt_config();
    assert!(extract_claims("invalid.token.here", &jwt_config).is_err());
}

#[test]
fn test_extract_claims_tampered_token() {
    let jwt_config = test_jwt_config();
    let token = generate_access_token("member-1", "role-1", "ada", &jwt_config).unwrap();

    let mut parts: Vec<&str> = token.split('.').collect();
    parts[2] = "c2lnbmF0dXJl";
    let tampered = parts.join(".");

    assert!(extract_claims(&tampered, &jwt_config).is_err());
}

#[test]
fn test_refresh_token_outlives_access_token() {
    let jwt_config = test_jwt_config();
    let access = generate_access_token("member-1", "role-1", "ada", &jwt_config).unwrap();
    let refresh = generate_refresh_token("member-1", "role-1", "ada", &jwt_config).unwrap();

    let access = extract_claims(&access, &jwt_config).unwrap();
    let refresh = extract_refresh_claims(&refresh, &jwt_config).unwrap();

    assert!(refresh.exp > access.exp);
    assert_eq!(refresh.token_type, TokenType::Refresh);
}

#[test]
fn test_tokens_are_not_interchangeable() {
    let jwt_config = test_jwt_config();
    let access = generate_access_token("member-1", "role-1", "ada", &jwt_config).unwrap();
    let refresh = generate_refresh_token("member-1", "role-1", "ada", &jwt_config).unwrap();

    assert!(extract_claims(&refresh, &jwt_config).is_err());
    assert!(extract_refresh_claims(&access, &jwt_config).is_err());
}

#[test]
fn test_extract_client_from_header() {
    let jwt_config = test_jwt_config();
    let token = generate_access_token("member-9", "role-1", "grace", &jwt_config).unwrap();

    let claims = extract_client(&bearer(&token), &jwt_config).unwrap();
    assert_eq!(claims.id, "member-9");
}
