//! Core types for the order exposure tracker.
//!
//! Prices and order values are fixed-point decimals so that aggregate
//! exposure sums stay exact; quantities are plain signed integers.

pub mod order;
pub mod price;

// Re-export primary types for convenient access via `ox_core::types::*`.
pub use order::{OrderId, ParseSideError, Side};
pub use price::Price;
