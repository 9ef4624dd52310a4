//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Timestamp, ValidationError};

/// Identifier of an authenticated principal, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gateway-facing customer identifier.
///
/// Minted fresh for every order as `cust_<unix_millis>_<9 random chars>`.
/// Never looked up and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

/// Length of the random suffix of a generated customer id.
const CUSTOMER_SUFFIX_LEN: usize = 9;

impl CustomerId {
    /// Generates a new customer id stamped with the current time.
    pub fn generate() -> Self {
        Self::generate_at(Timestamp::now())
    }

    /// Generates a customer id stamped with the given time.
    pub fn generate_at(at: Timestamp) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "cust_{}_{}",
            at.as_unix_millis(),
            &random[..CUSTOMER_SUFFIX_LEN]
        ))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
