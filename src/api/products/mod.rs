//! Product API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Fixed segments must come before /{id} to avoid path conflicts
        .route("/featured", get(handler::featured))
        .route("/slug/{slug}", get(handler::get_by_slug))
        .route("/category/{id}", get(handler::by_category))
        .route("/brand/{id}", get(handler::by_brand))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::deactivate),
        )
        .route(
            "/{id}/reviews",
            post(handler::add_review)
                .put(handler::update_review)
                .delete(handler::delete_review),
        )
}
