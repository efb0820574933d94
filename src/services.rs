pub mod category_service;
pub mod error;
pub mod transaction_service;

pub use category_service::{CategoryService, CategoryServiceImpl};
pub use error::{ErrorKind, ServiceError};
pub use transaction_service::{TransactionService, TransactionServiceImpl};
