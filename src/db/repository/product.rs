//! Product Repository
//!
//! Catalog CRUD plus the conditional stock decrement the order workflow
//! depends on.

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::catalog::product_rules::normalize_primary_image;
use crate::catalog::slug::slugify;
use crate::db::models::{
    Inventory, Price, Product, ProductCreate, ProductUpdate, Ratings, Review,
};
use crate::utils::time::now_millis;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

/// Retry budget for optimistic-lock conflicts on the stock decrement
const STOCK_CONFLICT_RETRIES: usize = 64;

/// SurrealDB aborts one of two overlapping writers with a retryable
/// commit conflict rather than blocking.
fn is_write_conflict(msg: &str) -> bool {
    msg.contains("read or write conflict") || msg.contains("can be retried")
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active, published products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true AND is_published = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find featured products
    pub async fn find_featured(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_featured = true AND is_active = true AND is_published = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find products in a category
    pub async fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<Product>> {
        let cat = make_record_id("category", category_id);
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE category = $cat AND is_active = true AND is_published = true ORDER BY name")
            .bind(("cat", cat))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find products of a brand
    pub async fn find_by_brand(&self, brand_id: &str) -> RepoResult<Vec<Product>> {
        let brand = make_record_id("brand", brand_id);
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE brand = $brand AND is_active = true AND is_published = true ORDER BY name")
            .bind(("brand", brand))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let product: Option<Product> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Find product by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Product>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let slug = data.slug.unwrap_or_else(|| slugify(&data.name));
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "slug derives to an empty string".to_string(),
            ));
        }
        if self.find_by_slug(&slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Product slug '{}' already exists",
                slug
            )));
        }

        let mut images = data.images;
        normalize_primary_image(&mut images);

        let product = Product {
            id: None,
            name: data.name,
            slug,
            description: data.description,
            brand: data.brand.as_deref().map(|b| make_record_id("brand", b)),
            category: data
                .category
                .as_deref()
                .map(|c| make_record_id("category", c)),
            price: Price {
                current: data.price,
                original: data.original_price,
            },
            inventory: Inventory::new(data.stock),
            ratings: Ratings::default(),
            images,
            reviews: Vec::new(),
            is_published: data.is_published.unwrap_or(true),
            is_active: true,
            is_featured: data.is_featured.unwrap_or(false),
            created_at: now_millis(),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(TABLE, id);
        let existing = self
            .find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let mut updated = existing;
        if let Some(name) = data.name {
            updated.name = name;
        }
        if let Some(description) = data.description {
            updated.description = Some(description);
        }
        if let Some(brand) = data.brand {
            updated.brand = Some(make_record_id("brand", &brand));
        }
        if let Some(category) = data.category {
            updated.category = Some(make_record_id("category", &category));
        }
        if let Some(price) = data.price {
            updated.price.current = price;
        }
        if let Some(original) = data.original_price {
            updated.price.original = Some(original);
        }
        if let Some(stock) = data.stock {
            updated.inventory = Inventory::new(stock);
        }
        if let Some(mut images) = data.images {
            normalize_primary_image(&mut images);
            updated.images = images;
        }
        if let Some(is_published) = data.is_published {
            updated.is_published = is_published;
        }
        if let Some(is_active) = data.is_active {
            updated.is_active = is_active;
        }
        if let Some(is_featured) = data.is_featured {
            updated.is_featured = is_featured;
        }

        self.save(updated).await
    }

    /// Persist a full product document
    pub async fn save(&self, product: Product) -> RepoResult<Product> {
        let record = product
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Product has no id".to_string()))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $record CONTENT $data RETURN AFTER")
            .bind(("record", record.clone()))
            .bind(("data", product))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", record)))
    }

    /// Replace the review set and aggregated ratings in one write
    pub async fn set_reviews(
        &self,
        id: &RecordId,
        reviews: Vec<Review>,
        ratings: Ratings,
    ) -> RepoResult<Product> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $record SET reviews = $reviews, ratings = $ratings RETURN AFTER")
            .bind(("record", id.clone()))
            .bind(("reviews", reviews))
            .bind(("ratings", ratings))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Conditionally decrement stock
    ///
    /// Single conditional update: the decrement only happens while
    /// `inventory.stock >= qty` still holds, which closes the read-then-write
    /// race between concurrent orders. Returns `None` only when stock was
    /// genuinely insufficient. The derived `is_in_stock` flag is rewritten in
    /// the same round trip.
    ///
    /// Under concurrency the storage engine may abort the losing writer with
    /// a retryable commit conflict instead of serializing it; those are
    /// retried here until the update reaches a real outcome.
    pub async fn try_decrement_stock(
        &self,
        id: &RecordId,
        qty: i64,
    ) -> RepoResult<Option<Product>> {
        for _ in 0..STOCK_CONFLICT_RETRIES {
            match self.decrement_once(id, qty).await {
                Err(RepoError::Database(msg)) if is_write_conflict(&msg) => {
                    tokio::task::yield_now().await;
                }
                outcome => return outcome,
            }
        }
        Err(RepoError::Database(format!(
            "Stock decrement for {} still conflicting after {} attempts",
            id, STOCK_CONFLICT_RETRIES
        )))
    }

    async fn decrement_once(&self, id: &RecordId, qty: i64) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $record SET inventory.stock -= $qty WHERE inventory.stock >= $qty RETURN AFTER;
                 UPDATE $record SET inventory.is_in_stock = inventory.stock > 0 RETURN AFTER;",
            )
            .bind(("record", id.clone()))
            .bind(("qty", qty))
            .await?;

        // The first statement's result decides success; the second only
        // refreshes the derived flag.
        let decremented: Vec<Product> = result.take(0)?;
        if decremented.is_empty() {
            return Ok(None);
        }
        let refreshed: Vec<Product> = result.take(1)?;
        Ok(refreshed.into_iter().next().or_else(|| {
            decremented.into_iter().next()
        }))
    }

    /// Soft delete: orders keep non-owning references, so products are only
    /// deactivated
    pub async fn deactivate(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let record = make_record_id(TABLE, pure_id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $record SET is_active = false RETURN AFTER")
            .bind(("record", record))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        if products.is_empty() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_conflict_detection() {
        assert!(is_write_conflict(
            "The query was not executed due to a failed transaction. \
             Failed to commit transaction due to a read or write conflict. \
             This transaction can be retried"
        ));
        assert!(!is_write_conflict("Not found: product abc"));
        assert!(!is_write_conflict("Parse error in query"));
    }
}
