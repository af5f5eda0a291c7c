//! Order Domain
//!
//! - [`totals`] - deterministic price breakdown (Decimal arithmetic)
//! - [`number`] - order number generation
//! - [`engine`] - the fulfillment workflow and status lifecycle

pub mod engine;
pub mod number;
pub mod totals;

pub use engine::OrderFulfillmentEngine;
