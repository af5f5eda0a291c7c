//! Category API Module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Fixed segments must come before /{id} to avoid path conflicts
        .route("/tree", get(handler::tree))
        .route("/roots", get(handler::roots))
        .route("/featured", get(handler::featured))
        .route("/level/{level}", get(handler::at_level))
        .route("/slug/{slug}", get(handler::get_by_slug))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/path", get(handler::path))
        .route("/{id}/parent", put(handler::reparent))
}
