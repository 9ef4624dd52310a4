//! Foundation module - Shared domain primitives.
//!
//! Identifiers, time, principals and validation errors used across
//! the payment domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::ValidationError;
pub use ids::{CustomerId, UserId};
pub use timestamp::Timestamp;
