use utoipa::OpenApi;

use crate::handlers::{category_handlers, health_handlers, transaction_handlers};
use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::filters::{ExpenseSummary, SummaryTotals, TransactionFilters};
use crate::models::transaction::{
    CreateTransactionRequest, Transaction, TransactionStatus, TransactionWithCategory,
    UpdateStatusRequest, UpdateTransactionRequest,
};
use crate::response::{CountMeta, ErrorResponse};
use crate::validation::FieldIssue;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        health_handlers::health_handler,
        category_handlers::list_categories_handler,
        category_handlers::get_category_handler,
        category_handlers::create_category_handler,
        category_handlers::update_category_handler,
        category_handlers::delete_category_handler,
        transaction_handlers::list_transactions_handler,
        transaction_handlers::expense_summary_handler,
        transaction_handlers::create_transaction_handler,
        transaction_handlers::update_transaction_handler,
        transaction_handlers::delete_transaction_handler,
        transaction_handlers::update_status_handler,
    ),
    components(
        schemas(
            Category,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            Transaction,
            TransactionWithCategory,
            TransactionStatus,
            TransactionFilters,
            CreateTransactionRequest,
            UpdateTransactionRequest,
            UpdateStatusRequest,
            ExpenseSummary,
            SummaryTotals,
            CountMeta,
            ErrorResponse,
            FieldIssue,
            health_handlers::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "categories", description = "Category management"),
        (name = "transactions", description = "Card transactions, status review and expense summary")
    ),
    info(
        title = "Expense Tracker API",
        version = "0.1.0",
        description = "REST API for categorizing corporate card transactions. \
            Successful responses are wrapped in `{success, data, message?, meta?}`.",
    )
)]
pub struct ApiDoc;
