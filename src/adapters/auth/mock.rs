//! Mock session validator for tests.
//!
//! ```ignore
//! let validator = MockSessionValidator::new().with_learner("token-1", "user-1");
//! let user = validator.validate("token-1").await?;
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Accepts a fixed set of tokens. Anything else is `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    sessions: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every token while set.
    outage: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.insert(token, user);
        self
    }

    /// Registers `token` for a learner whose email is `<user_id>@learners.test`.
    pub fn with_learner(self, token: impl Into<String>, user_id: &str) -> Self {
        let user = AuthenticatedUser::new(
            UserId::new(user_id).unwrap(),
            format!("{}@learners.test", user_id),
            Some(format!("Learner {}", user_id)),
        );
        self.with_user(token, user)
    }

    /// Every validation fails with `error` until [`Self::restore`].
    pub fn with_error(self, error: AuthError) -> Self {
        *self.outage.write().unwrap() = Some(error);
        self
    }

    pub fn restore(&self) {
        *self.outage.write().unwrap() = None;
    }

    pub fn insert(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.sessions.write().unwrap().insert(token.into(), user);
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.write().unwrap().remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.outage.read().unwrap().clone() {
            return Err(error);
        }

        self.sessions
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_token_yields_learner() {
        let validator = MockSessionValidator::new().with_learner("tok", "user-7");

        let user = validator.validate("tok").await.unwrap();

        assert_eq!(user.id.as_str(), "user-7");
        assert_eq!(user.email, "user-7@learners.test");
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = MockSessionValidator::new();
        assert_eq!(validator.validate("tok").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn outage_applies_until_restored() {
        let validator = MockSessionValidator::new()
            .with_learner("tok", "user-7")
            .with_error(AuthError::service_unavailable("idp down"));

        assert!(matches!(
            validator.validate("tok").await,
            Err(AuthError::ServiceUnavailable(_))
        ));

        validator.restore();
        assert!(validator.validate("tok").await.is_ok());
    }

    #[tokio::test]
    async fn revoked_token_is_invalid() {
        let validator = MockSessionValidator::new().with_learner("tok", "user-7");
        validator.revoke("tok");
        assert_eq!(validator.validate("tok").await, Err(AuthError::InvalidToken));
    }
}
