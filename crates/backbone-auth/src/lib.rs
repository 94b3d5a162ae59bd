//! # Backbone Auth
//!
//! Member authentication for backend services.
//!
//! This crate provides:
//!
//! - [`claims`]: JWT claim structures shared by access and refresh tokens
//! - [`jwt`]: Token generation and verification
//! - [`middleware`]: The [`AuthMember`] extractor and the member status cache key
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, extract::FromRef, routing::get};
//! use backbone_auth::AuthMember;
//! use backbone_config::JwtConfig;
//!
//! #[derive(Clone, FromRef)]
//! struct AppState {
//!     jwt_config: JwtConfig,
//! }
//!
//! async fn me(member: AuthMember) -> String {
//!     member.username().to_string()
//! }
//!
//! let app: Router<AppState> = Router::new().route("/me", get(me));
//! ```

pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::{Claims, TokenType};
pub use jwt::{
    bearer_token, extract_claims, extract_client, extract_raw_claims, extract_refresh_claims,
    generate_access_token, generate_refresh_token,
};
pub use middleware::{AuthMember, MemberStatusKey};
