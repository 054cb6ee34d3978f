pub mod error;
mod print_request;
pub mod types;
mod validated;

pub use error::AppError;
pub use error::handler_404;
pub use error::internal_error;
pub use print_request::print_req_res;
pub use validated::ValidatedJson;
