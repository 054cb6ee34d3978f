use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::PoolError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid data")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Validation(errors) => json!({ "status": self.to_string(), "errors": errors }),
            AppError::Internal(reason) => {
                tracing::error!(%reason, "request failed");
                json!({ "status": "Internal server error" })
            }
            _ => json!({ "status": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DieselError> for AppError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AppError::NotFound("Record not found".to_owned()),
            DieselError::DatabaseError(kind, info) => {
                tracing::debug!(detail = info.message(), constraint = ?info.constraint_name(), "database rejected write");
                match kind {
                    DatabaseErrorKind::UniqueViolation => {
                        AppError::Conflict("Record already exists".to_owned())
                    }
                    DatabaseErrorKind::ForeignKeyViolation => {
                        AppError::BadRequest("Referenced record does not exist".to_owned())
                    }
                    DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                        AppError::BadRequest("Invalid data".to_owned())
                    }
                    _ => AppError::Internal(info.message().to_owned()),
                }
            }
            DieselError::QueryBuilderError(_) => AppError::BadRequest("No changes to save".to_owned()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<bb8::RunError<PoolError>> for AppError {
    fn from(err: bb8::RunError<PoolError>) -> Self {
        internal_error(err)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        internal_error(err)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        internal_error(err)
    }
}

pub fn internal_error<E>(err: E) -> AppError
where
    E: std::error::Error,
{
    AppError::Internal(err.to_string())
}

pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}
