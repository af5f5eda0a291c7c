//! Category API Handlers
//!
//! Scalar updates go through the repository; any parent change goes through
//! the hierarchy manager so the denormalized subtree fields cascade.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::catalog::HierarchyManager;
use crate::core::AppState;
use crate::db::models::{Category, CategoryCreate, CategoryNode, CategoryUpdate, ReparentRequest};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult};

fn hierarchy(state: &AppState) -> HierarchyManager {
    HierarchyManager::new(state.db.clone(), state.reparent_locks.clone())
}

/// GET /api/categories - all active categories, level then sort order
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/categories/tree - flat tree annotated with has_children
pub async fn tree(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryNode>>> {
    Ok(Json(hierarchy(&state).tree().await?))
}

/// GET /api/categories/roots
pub async fn roots(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(hierarchy(&state).roots().await?))
}

/// GET /api/categories/featured
pub async fn featured(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(hierarchy(&state).featured().await?))
}

/// GET /api/categories/level/{level}
pub async fn at_level(
    State(state): State<AppState>,
    Path(level): Path<i32>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(hierarchy(&state).at_level(level).await?))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
    Ok(Json(category))
}

/// GET /api/categories/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))?;
    Ok(Json(category))
}

/// GET /api/categories/{id}/path - breadcrumb path, root first
pub async fn path(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(hierarchy(&state).path(&id).await?))
}

/// POST /api/categories - create category (admin)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    user.require_admin()?;
    validate_payload(&payload)?;

    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(payload).await?;

    tracing::info!(slug = %category.slug, level = category.level, "Category created");
    Ok(Json(category))
}

/// PUT /api/categories/{id} - scalar field update (admin)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    user.require_admin()?;
    validate_payload(&payload)?;

    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.update(&id, payload).await?))
}

/// PUT /api/categories/{id}/parent - reparent with subtree cascade (admin)
pub async fn reparent(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReparentRequest>,
) -> AppResult<Json<Category>> {
    user.require_admin()?;

    let category = hierarchy(&state)
        .reparent(&id, payload.parent.as_deref())
        .await?;

    tracing::info!(
        category = %id,
        parent = payload.parent.as_deref().unwrap_or("(root)"),
        level = category.level,
        "Category reparented"
    );
    Ok(Json(category))
}
