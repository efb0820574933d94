use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::handlers::error::ApiError;
use crate::handlers::extract::{QueryParams, ValidatedJson};
use crate::models::filters::{ExpenseSummary, SummaryTotals, TransactionListQuery};
use crate::models::transaction::{
    CreateTransactionRequest, Transaction, TransactionWithCategory, UpdateStatusRequest,
    UpdateTransactionRequest,
};
use crate::response::{self, ApiResponse, CountMeta, ErrorResponse};
use crate::services::transaction_service::TransactionService;
use crate::validation::validate_id;

const RESOURCE_ID: &str = "transaction ID";

pub const STATUS_UPDATED_MESSAGE: &str = "Transaction status updated successfully";

/// Handler for listing transactions
///
/// Every supplied filter must match; results are newest first.
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Matching transactions, with meta.count", body = [TransactionWithCategory]),
        (status = 400, description = "Malformed filter", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn list_transactions_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    QueryParams(query): QueryParams<TransactionListQuery>,
) -> Result<Json<ApiResponse<Vec<TransactionWithCategory>, CountMeta>>, ApiError> {
    let filters = query.into_filters().map_err(ApiError::InvalidRequest)?;
    let transactions = transaction_service.get_all(filters).await?;

    let meta = CountMeta {
        count: transactions.len(),
    };
    Ok(Json(response::success_with_meta(transactions, meta)))
}

/// Handler for the expense summary
#[utoipa::path(
    get,
    path = "/api/v1/transactions/summary",
    responses(
        (status = 200, description = "Totals per category, with grand totals in meta", body = [ExpenseSummary]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn expense_summary_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
) -> Result<Json<ApiResponse<Vec<ExpenseSummary>, SummaryTotals>>, ApiError> {
    let summary = transaction_service.get_expense_summary().await?;
    let totals = SummaryTotals::from_rows(&summary);
    Ok(Json(response::success_with_meta(summary, totals)))
}

/// Handler for recording a transaction
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = Transaction),
        (status = 400, description = "Invalid card digits, amount or body", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn create_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    ValidatedJson(request): ValidatedJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Transaction>>), ApiError> {
    let transaction = transaction_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(response::created(transaction))))
}

/// Handler for updating a transaction
///
/// Only the fields present in the body are changed.
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{id}",
    params(
        ("id" = i64, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Invalid ID or field", body = ErrorResponse),
        (status = 404, description = "Transaction or category not found", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn update_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTransactionRequest>,
) -> Result<Json<ApiResponse<Transaction>>, ApiError> {
    let id = validate_id(&id, RESOURCE_ID)?;
    let transaction = transaction_service.update(id, request).await?;
    Ok(Json(response::updated(transaction)))
}

/// Handler for deleting a transaction
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{id}",
    params(
        ("id" = i64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction deleted"),
        (status = 400, description = "Invalid transaction ID", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn delete_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id, RESOURCE_ID)?;
    transaction_service.delete(id).await?;
    Ok(Json(response::deleted()))
}

/// Handler for the status transition
///
/// Any status may be set regardless of the current one.
#[utoipa::path(
    patch,
    path = "/api/v1/transactions/{id}/status",
    params(
        ("id" = i64, Path, description = "Transaction ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Invalid ID or unknown status", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn update_status_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id, RESOURCE_ID)?;
    transaction_service.update_status(id, request.status).await?;
    Ok(Json(response::message(STATUS_UPDATED_MESSAGE)))
}
