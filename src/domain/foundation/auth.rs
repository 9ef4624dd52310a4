//! Principal types produced by the identity provider.
//!
//! The payment core never issues or stores sessions. It only consumes a
//! principal that some `SessionValidator` adapter has already vouched for.

use super::UserId;
use thiserror::Error;

/// Principal attached to a request after token validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject identifier from the identity provider.
    pub id: UserId,

    /// Email claim. Not used for the gateway customer record, which is
    /// always taken from the order request.
    pub email: String,

    /// Display name, when the provider supplies one.
    pub name: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name,
        }
    }
}

/// Reasons a bearer token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
