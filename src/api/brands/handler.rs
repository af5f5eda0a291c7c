//! Brand API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{Brand, BrandCreate, BrandUpdate};
use crate::db::repository::BrandRepository;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult};

/// GET /api/brands - all active brands
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Brand>>> {
    let repo = BrandRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/brands/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Brand>> {
    let repo = BrandRepository::new(state.db.clone());
    let brand = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Brand {} not found", id)))?;
    Ok(Json(brand))
}

/// GET /api/brands/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Brand>> {
    let repo = BrandRepository::new(state.db.clone());
    let brand = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Brand '{}' not found", slug)))?;
    Ok(Json(brand))
}

/// POST /api/brands - create brand (admin)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<BrandCreate>,
) -> AppResult<Json<Brand>> {
    user.require_admin()?;
    validate_payload(&payload)?;

    let repo = BrandRepository::new(state.db.clone());
    let brand = repo.create(payload).await?;

    tracing::info!(slug = %brand.slug, "Brand created");
    Ok(Json(brand))
}

/// PUT /api/brands/{id} - update brand (admin)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<BrandUpdate>,
) -> AppResult<Json<Brand>> {
    user.require_admin()?;
    validate_payload(&payload)?;

    let repo = BrandRepository::new(state.db.clone());
    Ok(Json(repo.update(&id, payload).await?))
}
