use axum::{
    Router,
    routing::{delete, get},
};

use super::handlers;
use crate::state::AppState;

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cart",
            get(handlers::get_cart).post(handlers::add_product_to_cart),
        )
        .route("/cart/{id}", delete(handlers::remove_product_from_cart))
}
