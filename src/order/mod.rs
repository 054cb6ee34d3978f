pub mod checkout;
pub mod handlers;
pub mod models;
pub mod routes;
