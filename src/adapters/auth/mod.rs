//! Session validator adapters.
//!
//! - `JwtSessionValidator` - HS256 tokens signed by the identity provider
//! - `MockSessionValidator` - fixed token map for tests

mod jwt;
mod mock;

pub use jwt::JwtSessionValidator;
pub use mock::MockSessionValidator;
