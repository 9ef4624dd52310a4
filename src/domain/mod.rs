//! Domain layer - payment order rules with no I/O.

pub mod foundation;
pub mod payment;
