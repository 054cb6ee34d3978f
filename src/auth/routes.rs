use axum::{
    Router,
    routing::post,
};

use super::handlers;
use crate::state::AppState;

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::create_user))
        .route("/auth/login", post(handlers::login_user))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/refresh", post(handlers::refresh_token))
        .route("/auth/change-password", post(handlers::change_password))
}
