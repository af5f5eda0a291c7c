//! HTTP API Module
//!
//! One submodule per resource; each exposes `router()` and nests itself under
//! its own `/api/...` prefix, so the server just merges them all.

pub mod auth;
pub mod brands;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
