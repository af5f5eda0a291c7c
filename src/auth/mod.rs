//! Authentication Module
//!
//! JWT issue/verify plus the `CurrentUser` extractor. Password hashing lives
//! on the `User` model (argon2).

pub mod extractor;
pub mod jwt;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
