//! User Profile Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{ProfileUpdate, User};
use crate::db::repository::UserRepository;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult};

/// GET /api/users/me - full profile including addresses
pub async fn profile(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;
    Ok(Json(record))
}

/// PUT /api/users/me - update profile fields
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<User>> {
    validate_payload(&payload)?;

    let repo = UserRepository::new(state.db.clone());
    let updated = repo.update_profile(&user.user_id, payload).await?;
    Ok(Json(updated))
}
