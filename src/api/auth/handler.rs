//! Authentication Handlers
//!
//! Registration, login and the current-user lookup. Login failures share a
//! single error message and a fixed delay so neither the response text nor
//! its timing reveals whether the username exists.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::utils::time::now_millis;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "username must be 3-32 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: i64,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// POST /api/auth/register - create a customer account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<UserInfo>> {
    validate_payload(&req)?;

    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .create(User {
            id: None,
            username: req.username,
            email: req.email,
            password_hash,
            full_name: req.full_name,
            // Registration always yields a customer; admins are provisioned
            // out of band.
            role: "customer".to_string(),
            addresses: Vec::new(),
            is_active: true,
            created_at: now_millis(),
        })
        .await?;

    tracing::info!(username = %user.username, "User registered");
    Ok(Json(user.into()))
}

/// POST /api/auth/login - authenticate and issue a JWT
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_username(&req.username).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::Forbidden("Account has been disabled".to_string()));
            }

            let password_valid = u.verify_password(&req.password).map_err(|e| {
                AppError::Internal(format!("Password verification failed: {}", e))
            })?;

            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .jwt_service
        .generate_token(&user_id, &user.username, &user.role)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me - fresh profile of the authenticated user
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;
    Ok(Json(record.into()))
}
