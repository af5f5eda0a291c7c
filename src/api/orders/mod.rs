//! Order API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_mine).post(handler::place))
        // Fixed segments must come before /{id} to avoid path conflicts
        .route("/all", get(handler::list_all))
        .route("/number/{number}", get(handler::get_by_number))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/reorder", post(handler::reorder))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/tracking", put(handler::add_tracking))
        .route("/{id}/delivered", post(handler::mark_delivered))
}
