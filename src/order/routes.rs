use axum::{
    Router,
    routing::{get, patch},
};

use super::handlers;
use crate::state::AppState;

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/checkout",
            get(handlers::get_cart_checkout).post(handlers::checkout_cart),
        )
        .route(
            "/checkout/buy-now/{product_id}/{quantity}",
            get(handlers::get_buy_now_checkout).post(handlers::checkout_buy_now),
        )
        .route("/orders", get(handlers::get_my_orders))
        .route("/orders/{id}", get(handlers::get_order_confirmation))
        .route("/orders/{id}/status", patch(handlers::update_order_status))
}
