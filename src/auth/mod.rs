pub mod backend;
pub mod handlers;
pub mod jwt;
pub mod models;
mod password;
pub mod routes;

pub use backend::find_user;
pub use jwt::AccessTokenClaims;
