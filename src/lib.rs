//! Storefront Server - embedded e-commerce backend
//!
//! # Architecture overview
//!
//! - **Catalog** (`catalog`): slugs, the category hierarchy manager and
//!   product derived-state rules
//! - **Orders** (`orders`): price breakdown, order numbers and the
//!   fulfillment engine (placement, inventory claims, status lifecycle)
//! - **Database** (`db`): embedded SurrealDB storage, models and repositories
//! - **Auth** (`auth`): JWT + Argon2 authentication
//! - **HTTP API** (`api`): RESTful routes, one module per resource
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Config, state, server lifecycle
//! ├── auth/          # JWT issue/verify, extractor
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # Slugs, hierarchy, product rules
//! ├── orders/        # Totals, numbers, fulfillment engine
//! ├── db/            # Models and repositories
//! └── utils/         # Errors, logging, time, validation
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use catalog::HierarchyManager;
pub use core::{AppState, Config, Server};
pub use orders::OrderFulfillmentEngine;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
