//! HTTP adapter for the payment endpoints.
//!
//! - `POST /api/create-order` - create a gateway order for the signed-in user
//! - `POST /api/verify-order` - read an order's status from the gateway
//! - `POST /api/webhooks/cashfree` - accept signed gateway callbacks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{PaymentApiError, PaymentsAppState};
pub use routes::payment_routes;
