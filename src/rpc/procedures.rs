//! Named procedures of the RPC surface.
//!
//! Inputs are plain JSON values with the same field names as the REST
//! payloads. Dates travel as RFC 3339 strings and are parsed straight into
//! `DateTime<Utc>`, so procedures see native dates.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::models::category::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::filters::TransactionFilters;
use crate::models::transaction::{
    CreateTransactionRequest, UpdateStatusRequest, UpdateTransactionRequest,
};
use crate::rpc::error::RpcError;
use crate::services::ServiceError;
use crate::state::AppState;
use crate::validation::{FieldIssue, collect_issues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    HealthCheck,
    CategoryGetAll,
    CategoryGetById,
    CategoryCreate,
    CategoryUpdate,
    CategoryDelete,
    TransactionCreate,
    TransactionUpdate,
    TransactionDelete,
    TransactionGetAll,
    TransactionUpdateStatus,
    TransactionGetExpenseSummary,
}

impl Procedure {
    pub const ALL: [Procedure; 12] = [
        Procedure::HealthCheck,
        Procedure::CategoryGetAll,
        Procedure::CategoryGetById,
        Procedure::CategoryCreate,
        Procedure::CategoryUpdate,
        Procedure::CategoryDelete,
        Procedure::TransactionCreate,
        Procedure::TransactionUpdate,
        Procedure::TransactionDelete,
        Procedure::TransactionGetAll,
        Procedure::TransactionUpdateStatus,
        Procedure::TransactionGetExpenseSummary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Procedure::HealthCheck => "healthCheck",
            Procedure::CategoryGetAll => "category.getAll",
            Procedure::CategoryGetById => "category.getById",
            Procedure::CategoryCreate => "category.create",
            Procedure::CategoryUpdate => "category.update",
            Procedure::CategoryDelete => "category.delete",
            Procedure::TransactionCreate => "transaction.create",
            Procedure::TransactionUpdate => "transaction.update",
            Procedure::TransactionDelete => "transaction.delete",
            Procedure::TransactionGetAll => "transaction.getAll",
            Procedure::TransactionUpdateStatus => "transaction.updateStatus",
            Procedure::TransactionGetExpenseSummary => "transaction.getExpenseSummary",
        }
    }

    /// Runs the procedure against the services in `state`
    pub async fn call(self, state: &AppState, input: Value) -> Result<Value, RpcError> {
        let categories = &state.category_service;
        let transactions = &state.transaction_service;

        match self {
            Procedure::HealthCheck => Ok(json!("OK")),

            Procedure::CategoryGetAll => output(categories.get_all().await?),

            Procedure::CategoryGetById => {
                let IdInput { id } = parse_input(input)?;
                output(categories.get_by_id(id).await?)
            }

            Procedure::CategoryCreate => {
                let request: CreateCategoryRequest = parse_input(input)?;
                output(categories.create(&request.name).await?)
            }

            Procedure::CategoryUpdate => {
                let WithId { id, fields } = parse_input::<WithId<UpdateCategoryRequest>>(input)?;
                output(categories.update(id, &fields.name).await?)
            }

            Procedure::CategoryDelete => {
                let IdInput { id } = parse_input(input)?;
                categories.delete(id).await?;
                Ok(json!({ "success": true }))
            }

            Procedure::TransactionCreate => {
                let request: CreateTransactionRequest = parse_input(input)?;
                output(transactions.create(request).await?)
            }

            Procedure::TransactionUpdate => {
                let WithId { id, fields } =
                    parse_input::<WithId<UpdateTransactionRequest>>(input)?;
                output(transactions.update(id, fields).await?)
            }

            Procedure::TransactionDelete => {
                let IdInput { id } = parse_input(input)?;
                transactions.delete(id).await?;
                Ok(json!({ "success": true }))
            }

            Procedure::TransactionGetAll => {
                // Input is optional here
                let filters = if input.is_null() {
                    TransactionFilters::default()
                } else {
                    deserialize_input(input)?
                };
                output(transactions.get_all(filters).await?)
            }

            Procedure::TransactionUpdateStatus => {
                let WithId { id, fields } = parse_input::<WithId<UpdateStatusRequest>>(input)?;
                transactions.update_status(id, fields.status).await?;
                Ok(json!({ "success": true }))
            }

            Procedure::TransactionGetExpenseSummary => {
                output(transactions.get_expense_summary().await?)
            }
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Procedure {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Procedure::ALL
            .into_iter()
            .find(|procedure| procedure.name() == s)
            .ok_or_else(|| RpcError::UnknownProcedure(s.to_string()))
    }
}

/// Input of procedures that only need an entity id
#[derive(Debug, Deserialize, Validate)]
struct IdInput {
    id: i64,
}

/// An id alongside a request payload, as one flat JSON object
#[derive(Debug, Deserialize)]
struct WithId<T> {
    id: i64,
    #[serde(flatten)]
    fields: T,
}

impl<T: Validate> Validate for WithId<T> {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        self.fields.validate()
    }
}

fn deserialize_input<T: DeserializeOwned>(input: Value) -> Result<T, RpcError> {
    serde_json::from_value(input)
        .map_err(|e| RpcError::BadInput(vec![FieldIssue::new("input", e.to_string())]))
}

fn parse_input<T: DeserializeOwned + Validate>(input: Value) -> Result<T, RpcError> {
    let value: T = deserialize_input(input)?;
    value
        .validate()
        .map_err(|errors| RpcError::BadInput(collect_issues(&errors)))?;
    Ok(value)
}

fn output<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| ServiceError::Internal(e.to_string()).into())
}
