//! Cashfree payment gateway adapters.
//!
//! - `CashfreeGateway` - REST client for the Cashfree PG API
//! - `MockPaymentGateway` - in-process fake for tests

mod api_types;
mod cashfree_adapter;
mod mock_gateway;

pub use cashfree_adapter::{CashfreeConfig, CashfreeGateway};
pub use mock_gateway::{MethodCall, MockPaymentGateway};
