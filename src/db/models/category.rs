//! Category Model
//!
//! Categories form a forest. `ancestors` and `level` are denormalized so that
//! subtree queries and breadcrumb paths are O(1) reads; the hierarchy manager
//! keeps them consistent when a parent link changes.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type CategoryId = RecordId;

/// Category model
///
/// Invariants (maintained by `catalog::hierarchy`):
/// - `level == ancestors.len()`
/// - non-root: `ancestors == parent.ancestors ++ [parent.id]`
/// - root: `parent == None`, `ancestors == []`, `level == 0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    /// URL-safe identifier, unique
    pub slug: String,
    pub description: Option<String>,
    /// Record link to the parent category; None for roots
    #[serde(default)]
    pub parent: Option<RecordId>,
    /// Ids from root to immediate parent, exclusive of self
    #[serde(default)]
    pub ancestors: Vec<RecordId>,
    /// Depth in the tree; roots are 0
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Derived from name when absent
    pub slug: Option<String>,
    pub description: Option<String>,
    /// Parent category id; absent means root
    pub parent: Option<String>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update payload; parent changes go through the reparent endpoint instead
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Reparent payload: `null`/absent parent makes the category a root
#[derive(Debug, Clone, Deserialize)]
pub struct ReparentRequest {
    pub parent: Option<String>,
}

/// Flat tree node for listing: the category plus a `has_children` marker
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub has_children: bool,
}
