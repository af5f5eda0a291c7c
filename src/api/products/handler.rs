//! Product API Handlers
//!
//! Browsing endpoints only surface active, published products; the admin
//! write surface can still fetch and edit anything by id.
//!
//! Reviews are embedded in the product document, one per user. The one-review
//! rule and the ratings recomputation both live here on the write path.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::catalog::product_rules::recompute_ratings;
use crate::core::AppState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, Review, ReviewCreate};
use crate::db::repository::{ProductRepository, make_record_id};
use crate::utils::time::now_millis;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult};

/// GET /api/products - all active, published products
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/products/featured
pub async fn featured(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.find_featured().await?))
}

/// GET /api/products/category/{id}
pub async fn by_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.find_by_category(&id).await?))
}

/// GET /api/products/brand/{id}
pub async fn by_brand(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.find_by_brand(&id).await?))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// GET /api/products/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", slug)))?;
    Ok(Json(product))
}

/// POST /api/products - create product (admin)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    user.require_admin()?;
    validate_payload(&payload)?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await?;

    tracing::info!(slug = %product.slug, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/{id} - update product (admin)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    user.require_admin()?;
    validate_payload(&payload)?;

    let repo = ProductRepository::new(state.db.clone());
    Ok(Json(repo.update(&id, payload).await?))
}

/// DELETE /api/products/{id} - soft delete (admin)
///
/// Orders keep non-owning references to products, so deletion only clears
/// `is_active`.
pub async fn deactivate(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user.require_admin()?;

    let repo = ProductRepository::new(state.db.clone());
    let result = repo.deactivate(&id).await?;

    tracing::info!(product = %id, "Product deactivated");
    Ok(Json(result))
}

// =============================================================================
// Reviews
// =============================================================================

async fn load_product(repo: &ProductRepository, id: &str) -> AppResult<Product> {
    Ok(repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?)
}

async fn persist_reviews(
    repo: &ProductRepository,
    product: Product,
    reviews: Vec<Review>,
) -> AppResult<Product> {
    let record = product
        .id
        .ok_or_else(|| AppError::Database("Product has no id".to_string()))?;
    let ratings = recompute_ratings(&reviews);
    Ok(repo.set_reviews(&record, reviews, ratings).await?)
}

/// POST /api/products/{id}/reviews - add a review (one per user)
pub async fn add_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Product>> {
    validate_payload(&payload)?;

    let repo = ProductRepository::new(state.db.clone());
    let product = load_product(&repo, &id).await?;
    let author = make_record_id("user", &user.user_id);

    let mut reviews = product.reviews.clone();
    if reviews.iter().any(|r| r.user == author) {
        return Err(AppError::Conflict(
            "You have already reviewed this product".to_string(),
        ));
    }

    reviews.push(Review {
        user: author,
        rating: payload.rating,
        title: payload.title,
        comment: payload.comment,
        created_at: now_millis(),
    });

    let updated = persist_reviews(&repo, product, reviews).await?;
    Ok(Json(updated))
}

/// PUT /api/products/{id}/reviews - update the caller's review
pub async fn update_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Product>> {
    validate_payload(&payload)?;

    let repo = ProductRepository::new(state.db.clone());
    let product = load_product(&repo, &id).await?;
    let author = make_record_id("user", &user.user_id);

    let mut reviews = product.reviews.clone();
    let existing = reviews
        .iter_mut()
        .find(|r| r.user == author)
        .ok_or_else(|| AppError::NotFound("You have not reviewed this product".to_string()))?;

    existing.rating = payload.rating;
    existing.title = payload.title;
    existing.comment = payload.comment;

    let updated = persist_reviews(&repo, product, reviews).await?;
    Ok(Json(updated))
}

/// DELETE /api/products/{id}/reviews - remove the caller's review
pub async fn delete_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = load_product(&repo, &id).await?;
    let author = make_record_id("user", &user.user_id);

    let mut reviews = product.reviews.clone();
    let before = reviews.len();
    reviews.retain(|r| r.user != author);
    if reviews.len() == before {
        return Err(AppError::NotFound(
            "You have not reviewed this product".to_string(),
        ));
    }

    let updated = persist_reviews(&repo, product, reviews).await?;
    Ok(Json(updated))
}
