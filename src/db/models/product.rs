//! Product Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type ProductId = RecordId;

/// Price pair: current selling price and optional original (pre-sale) price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Price {
    pub current: f64,
    pub original: Option<f64>,
}

impl Price {
    /// On sale when the original price is strictly above the current one
    pub fn is_on_sale(&self) -> bool {
        self.original.map(|o| o > self.current).unwrap_or(false)
    }
}

/// Inventory state; `is_in_stock` is derived (`stock > 0`) and rewritten on
/// every stock mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub stock: i64,
    pub is_in_stock: bool,
}

impl Inventory {
    pub fn new(stock: i64) -> Self {
        Self {
            stock,
            is_in_stock: stock > 0,
        }
    }
}

/// Review counts per star, index 0 = 1 star .. index 4 = 5 stars
pub type RatingDistribution = [u32; 5];

/// Aggregated rating state, recomputed whenever the review set changes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub distribution: RatingDistribution,
}

/// Product image; at most one is primary after normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub alt: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Embedded review, one per user per product (enforced at the route layer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Record link to the authoring user
    pub user: RecordId,
    /// 1..=5
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    /// URL-safe identifier, unique
    pub slug: String,
    pub description: Option<String>,
    /// Record link to brand
    #[serde(default)]
    pub brand: Option<RecordId>,
    /// Record link to category
    #[serde(default)]
    pub category: Option<RecordId>,
    pub price: Price,
    pub inventory: Inventory,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default = "default_true")]
    pub is_published: bool,
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

impl Product {
    /// Eligible for ordering: active and published
    pub fn is_available(&self) -> bool {
        self.is_active && self.is_published
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Derived from name when absent
    pub slug: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub price: f64,
    #[validate(range(min = 0.0, message = "original price must be non-negative"))]
    pub original_price: Option<f64>,
    #[validate(range(min = 0, message = "stock must be non-negative"))]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, message = "original price must be non-negative"))]
    pub original_price: Option<f64>,
    #[validate(range(min = 0, message = "stock must be non-negative"))]
    pub stock: Option<i64>,
    pub images: Option<Vec<ProductImage>>,
    pub is_published: Option<bool>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewCreate {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_sale_requires_higher_original() {
        let discounted = Price {
            current: 79.99,
            original: Some(99.99),
        };
        assert!(discounted.is_on_sale());

        let full_price = Price {
            current: 99.99,
            original: None,
        };
        assert!(!full_price.is_on_sale());

        let same_price = Price {
            current: 99.99,
            original: Some(99.99),
        };
        assert!(!same_price.is_on_sale());
    }

    #[test]
    fn test_inventory_derives_in_stock() {
        assert!(Inventory::new(1).is_in_stock);
        assert!(!Inventory::new(0).is_in_stock);
    }
}
