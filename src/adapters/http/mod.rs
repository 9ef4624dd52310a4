//! HTTP adapters - axum routes, middleware and DTOs.

pub mod health;
pub mod middleware;
pub mod payments;

pub use health::{health_routes, HealthState};
pub use payments::{payment_routes, PaymentsAppState};

use axum::Router;

use middleware::{AuthState, RateLimiterState};

/// Complete application router: `/health` plus the payment API under `/api`.
///
/// Cross-cutting layers (tracing, request ids, timeouts, CORS) are added by
/// the binary.
pub fn app_router(
    payments: PaymentsAppState,
    auth: AuthState,
    limiter: RateLimiterState,
    health: HealthState,
) -> Router {
    Router::new()
        .nest("/api", payment_routes(auth, limiter).with_state(payments))
        .merge(health_routes().with_state(health))
}
