use axum::{
    Router,
    routing::{get, post},
};

use super::handlers;
use crate::state::AppState;

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/feedback",
            get(handlers::get_feedback_context).post(handlers::submit_feedback),
        )
        .route(
            "/orders/{id}/feedback",
            get(handlers::get_order_feedback_context).post(handlers::submit_order_feedback),
        )
        .route("/admin/feedback", get(handlers::get_all_feedback))
        .route(
            "/admin/feedback/{id}/mark-read",
            post(handlers::mark_feedback_read),
        )
}
