//! Core Module
//!
//! Configuration, shared state and HTTP server lifecycle.

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, ShippingRates};
pub use server::Server;
pub use state::{AppState, ReparentLocks};
