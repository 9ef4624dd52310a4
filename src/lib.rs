//! Payment Orders - gateway order lifecycle and webhook verification.
//!
//! Creates payment orders with the gateway on behalf of signed-in users,
//! reports their status, and accepts signed gateway webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
