//! Brand Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type BrandId = RecordId;

/// Brand model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BrandId>,
    pub name: String,
    /// URL-safe identifier, unique
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BrandCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Derived from name when absent
    pub slug: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BrandUpdate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}
