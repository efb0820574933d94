pub mod category;
pub mod filters;
pub mod transaction;

pub use category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
pub use filters::{ExpenseSummary, SummaryTotals, TransactionFilters, TransactionListQuery};
pub use transaction::{
    CreateTransactionRequest, NewTransaction, Transaction, TransactionStatus,
    TransactionWithCategory, UpdateStatusRequest, UpdateTransactionRequest,
};
