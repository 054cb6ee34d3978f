pub mod auth;
pub mod cart;
pub mod category;
pub mod config;
pub mod favourite;
pub mod feedback;
pub mod notification;
pub mod order;
pub mod pool;
pub mod product;
pub mod rmq;
pub mod schema;
pub mod state;
pub mod user;
pub mod utils;

use axum::{Router, middleware};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use state::AppState;
use utils::{AppError, internal_error};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

pub fn app(state: AppState) -> Router {
    let routes = Router::new()
        .merge(auth::routes::get_routes())
        .merge(user::routes::get_routes())
        .merge(category::routes::get_routes())
        .merge(product::routes::get_routes())
        .merge(cart::routes::get_routes())
        .merge(favourite::routes::get_routes())
        .merge(order::routes::get_routes())
        .merge(feedback::routes::get_routes());

    Router::new()
        .nest("/api", routes)
        .fallback(utils::handler_404)
        .layer(middleware::from_fn(utils::print_req_res))
        .with_state(state)
}

pub fn establish_connection(db_url: &str) -> Result<PgConnection, AppError> {
    PgConnection::establish(db_url).map_err(internal_error)
}

/// Applies pending embedded migrations on a blocking connection.
pub async fn run_migrations(db_url: String) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || {
        let mut conn = establish_connection(&db_url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Internal(format!("Failed to run migrations: {e}")))?;

        for version in applied {
            tracing::info!(%version, "applied migration");
        }

        Ok(())
    })
    .await?
}
