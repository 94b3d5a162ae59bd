use axum::body::Body;
use axum::response::Response;
use backbone::config::JwtConfig;
use http_body_util::BodyExt;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test_access_key_for_testing_purposes".to_string(),
        refresh_secret: "test_refresh_key_for_testing_purposes".to_string(),
        access_expiry_minutes: 60,
        refresh_expiry_hours: 720,
        issuer: "backbone-test".to_string(),
    }
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
