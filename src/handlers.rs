pub mod category_handlers;
pub mod error;
pub mod extract;
pub mod health_handlers;
pub mod transaction_handlers;

pub use error::{ApiError, endpoint_not_found};
pub use extract::{QueryParams, ValidatedJson};
