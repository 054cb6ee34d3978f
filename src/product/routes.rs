use axum::{
    Router,
    routing::get,
};

use super::handlers;
use crate::state::AppState;

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(handlers::get_home))
        .route(
            "/products",
            get(handlers::get_products).post(handlers::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product_by_id)
                .patch(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/collections/{name}/{product}",
            get(handlers::get_product_details),
        )
}
