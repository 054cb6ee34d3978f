use axum::{
    Router,
    routing::get,
};

use super::handlers;
use crate::state::AppState;

pub fn get_routes() -> Router<AppState> {
    Router::new().route(
        "/users/me",
        get(handlers::get_current_user).patch(handlers::update_profile),
    )
}
