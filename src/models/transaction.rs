use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{card_last_four_format, positive_amount};

/// Review status of a card transaction.
///
/// Any status may be replaced by any other; there is no transition graph.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Pending,
        TransactionStatus::Approved,
        TransactionStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{0}', expected one of: pending, approved, rejected")]
pub struct ParseStatusError(pub String);

impl FromStr for TransactionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Card transaction as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub card_last_four: String,
    pub amount: f64,
    pub category_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: a transaction joined with its category name.
///
/// `category_name` is "Unknown" when the category no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithCategory {
    pub id: i64,
    pub card_last_four: String,
    pub amount: f64,
    pub category_id: i64,
    pub category_name: String,
    pub transaction_date: DateTime<Utc>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully resolved insert: defaults already applied by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub card_last_four: String,
    pub amount: f64,
    pub category_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub status: TransactionStatus,
}

/// Request payload for recording a transaction
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "cardLastFour": "1234",
    "amount": 45.50,
    "categoryId": 1,
    "transactionDate": "2024-01-15T12:00:00Z",
    "status": "pending"
}))]
pub struct CreateTransactionRequest {
    #[validate(custom(function = "card_last_four_format"))]
    #[schema(pattern = "^[0-9]{4}$", example = "1234")]
    pub card_last_four: String,

    #[validate(custom(function = "positive_amount"))]
    #[schema(minimum = 0.01, example = 45.50)]
    pub amount: f64,

    pub category_id: i64,

    /// Defaults to the time of creation
    pub transaction_date: Option<DateTime<Utc>>,

    /// Defaults to `pending`
    pub status: Option<TransactionStatus>,
}

/// Partial update: absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "amount": 50.00 }))]
pub struct UpdateTransactionRequest {
    #[validate(custom(function = "card_last_four_format"))]
    #[schema(pattern = "^[0-9]{4}$")]
    pub card_last_four: Option<String>,

    #[validate(custom(function = "positive_amount"))]
    #[schema(minimum = 0.01)]
    pub amount: Option<f64>,

    pub category_id: Option<i64>,

    pub transaction_date: Option<DateTime<Utc>>,

    pub status: Option<TransactionStatus>,
}

/// Request payload for the status transition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "status": "approved" }))]
pub struct UpdateStatusRequest {
    pub status: TransactionStatus,
}
