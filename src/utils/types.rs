use diesel_async::{AsyncPgConnection, pooled_connection::AsyncDieselConnectionManager};
use serde::{Deserialize, Serialize};

use super::error::AppError;

pub type Pool = bb8::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub type Result<T> = std::result::Result<axum::Json<T>, AppError>;

/// Plain `{"status": "..."}` body used by the cart and favourites endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusMessage {
    pub status: String,
}

impl StatusMessage {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}
