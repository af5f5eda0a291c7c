//! Utility Module
//!
//! Shared helpers: unified errors, result aliases, logging setup, time helpers.

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
