//! Catalog Domain
//!
//! - [`slug`] - URL-safe identifier derivation
//! - [`hierarchy`] - category tree invariant maintenance (reparent + cascade)
//! - [`product_rules`] - explicit recomputation of derived product state

pub mod hierarchy;
pub mod product_rules;
pub mod slug;

pub use hierarchy::HierarchyManager;
