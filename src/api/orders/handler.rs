//! Order API Handlers
//!
//! Customers place, view, cancel and re-place their own orders. The
//! fulfillment side (status overrides, tracking, delivery confirmation) is
//! admin-only. All lifecycle logic lives in the fulfillment engine; handlers
//! only do auth and shape the request.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::models::{Order, OrderStatus, PlaceOrderRequest};
use crate::db::repository::{OrderRepository, make_record_id};
use crate::orders::OrderFulfillmentEngine;
use crate::utils::{AppError, AppResult};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

fn engine(state: &AppState) -> OrderFulfillmentEngine {
    OrderFulfillmentEngine::new(state.db.clone(), state.config.clone())
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    fn resolve(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct TrackingRequest {
    pub tracking_number: String,
    /// Millisecond timestamp
    pub estimated_delivery: Option<i64>,
}

/// POST /api/orders - place an order from a cart
pub async fn place(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).place_order(&user.user_id, payload).await?;
    Ok(Json(order))
}

/// GET /api/orders - the caller's orders, newest first
pub async fn list_mine(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<Order>>> {
    let (limit, offset) = pagination.resolve();
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_by_user(&make_record_id("user", &user.user_id), limit, offset)
        .await?;
    Ok(Json(orders))
}

/// GET /api/orders/all - every order (admin)
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<Order>>> {
    user.require_admin()?;

    let (limit, offset) = pagination.resolve();
    let repo = OrderRepository::new(state.db.clone());
    Ok(Json(repo.find_all(limit, offset).await?))
}

/// GET /api/orders/{id} - one order; owner or admin
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

    if !user.is_admin() && order.user != make_record_id("user", &user.user_id) {
        return Err(AppError::Forbidden(
            "Order belongs to another user".to_string(),
        ));
    }
    Ok(Json(order))
}

/// GET /api/orders/number/{number} - lookup by order number; owner or admin
pub async fn get_by_number(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(number): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_number(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", number)))?;

    if !user.is_admin() && order.user != make_record_id("user", &user.user_id) {
        return Err(AppError::Forbidden(
            "Order belongs to another user".to_string(),
        ));
    }
    Ok(Json(order))
}

/// POST /api/orders/{id}/cancel - cancel while not shipped
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<Order>> {
    let order = engine(&state)
        .cancel_order(&id, &user.user_id, payload.reason)
        .await?;

    tracing::info!(order_number = %order.order_number, "Order cancelled");
    Ok(Json(order))
}

/// POST /api/orders/{id}/reorder - re-place a previous order
pub async fn reorder(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).reorder(&id, &user.user_id).await?;
    Ok(Json(order))
}

/// PUT /api/orders/{id}/status - status override (admin)
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Order>> {
    user.require_admin()?;

    let order = engine(&state).update_status(&id, payload.status).await?;

    tracing::info!(
        order_number = %order.order_number,
        status = ?order.status,
        "Order status updated"
    );
    Ok(Json(order))
}

/// PUT /api/orders/{id}/tracking - attach tracking, moves to shipped (admin)
pub async fn add_tracking(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<TrackingRequest>,
) -> AppResult<Json<Order>> {
    user.require_admin()?;

    let order = engine(&state)
        .add_tracking(&id, payload.tracking_number, payload.estimated_delivery)
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/delivered - confirm delivery (admin)
pub async fn mark_delivered(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    user.require_admin()?;

    let order = engine(&state).mark_delivered(&id).await?;
    Ok(Json(order))
}
