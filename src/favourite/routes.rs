use axum::{
    Router,
    routing::{delete, get},
};

use super::handlers;
use crate::state::AppState;

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/favourites",
            get(handlers::get_favourites).post(handlers::add_favourite),
        )
        .route("/favourites/{id}", delete(handlers::remove_favourite))
}
