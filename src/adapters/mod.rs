//! Adapters - implementations of port interfaces.
//!
//! - `auth` - bearer token validation (HS256 JWT, mock)
//! - `cashfree` - payment gateway client (reqwest, mock)
//! - `events` - webhook dispatch sink and processed-event stores
//! - `http` - axum routes, middleware and DTOs
//! - `rate_limiter` - fixed-window counters (in-memory, Redis)

pub mod auth;
pub mod cashfree;
pub mod events;
pub mod http;
pub mod rate_limiter;
