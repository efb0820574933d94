//! Services shared by every request handler.

use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::repositories::{SqliteCategoryRepository, SqliteTransactionRepository};
use crate::services::{
    CategoryService, CategoryServiceImpl, TransactionService, TransactionServiceImpl,
};

/// The state of the server. Services are built once at startup and handlers
/// pick the one they need through [`FromRef`].
#[derive(Clone, FromRef)]
pub struct AppState {
    pub category_service: Arc<dyn CategoryService>,
    pub transaction_service: Arc<dyn TransactionService>,
}

impl AppState {
    pub fn new(
        category_service: Arc<dyn CategoryService>,
        transaction_service: Arc<dyn TransactionService>,
    ) -> Self {
        Self {
            category_service,
            transaction_service,
        }
    }

    /// Wires the SQLite repositories into the services.
    pub fn from_pool(pool: SqlitePool) -> Self {
        let category_repository = Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let transaction_repository = Arc::new(SqliteTransactionRepository::new(pool));

        let category_service: Arc<dyn CategoryService> =
            Arc::new(CategoryServiceImpl::new(category_repository.clone()));
        let transaction_service: Arc<dyn TransactionService> = Arc::new(
            TransactionServiceImpl::new(transaction_repository, category_repository),
        );

        Self::new(category_service, transaction_service)
    }
}
