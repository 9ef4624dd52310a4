//! HTTP middleware for axum.
//!
//! - `auth` - bearer token validation and the `OptionalAuth` extractor
//! - `rate_limit` - fixed-window limits per global/IP/user scope

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthState, OptionalAuth};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
