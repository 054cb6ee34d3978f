use diesel_async::{AsyncPgConnection, pooled_connection::AsyncDieselConnectionManager};

use crate::utils::{AppError, internal_error, types::Pool};

pub async fn get_pool(db_url: &str) -> Result<Pool, AppError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
    let pool = bb8::Pool::builder()
        .build(config)
        .await
        .map_err(internal_error)?;

    Ok(pool)
}
