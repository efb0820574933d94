use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::transaction::TransactionStatus;
use crate::validation::FieldIssue;

/// Conjunctive filters for the transaction listing. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    pub category_id: Option<i64>,
    pub status: Option<TransactionStatus>,
    /// Inclusive lower bound on the transaction date
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the transaction date
    pub date_to: Option<DateTime<Utc>>,
}

/// Raw query string of `GET /transactions`, before normalization
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionListQuery {
    /// Category ID
    pub category_id: Option<String>,
    /// One of pending, approved, rejected
    pub status: Option<String>,
    /// RFC 3339 timestamp, inclusive
    pub date_from: Option<String>,
    /// RFC 3339 timestamp, inclusive
    pub date_to: Option<String>,
}

impl TransactionListQuery {
    /// Converts the string parameters into typed filters, reporting every
    /// malformed parameter at once.
    pub fn into_filters(self) -> Result<TransactionFilters, Vec<FieldIssue>> {
        let mut issues = Vec::new();

        let category_id = self.category_id.and_then(|raw| match raw.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                issues.push(FieldIssue::new("categoryId", "Expected an integer"));
                None
            }
        });

        let status = self.status.and_then(|raw| match raw.parse::<TransactionStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                issues.push(FieldIssue::new("status", e.to_string()));
                None
            }
        });

        let date_from = parse_timestamp("dateFrom", self.date_from, &mut issues);
        let date_to = parse_timestamp("dateTo", self.date_to, &mut issues);

        if !issues.is_empty() {
            return Err(issues);
        }

        Ok(TransactionFilters {
            category_id,
            status,
            date_from,
            date_to,
        })
    }
}

fn parse_timestamp(
    field: &str,
    raw: Option<String>,
    issues: &mut Vec<FieldIssue>,
) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
        Err(_) => {
            issues.push(FieldIssue::new(field, "Expected an ISO 8601 date-time"));
            None
        }
    }
}

/// Spending per category. Only categories with transactions appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub category_id: i64,
    pub category_name: String,
    pub total_amount: f64,
    pub transaction_count: i64,
}

/// Grand totals over a set of summary rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_amount: f64,
    pub total_transactions: i64,
    pub category_count: usize,
}

impl SummaryTotals {
    pub fn from_rows(rows: &[ExpenseSummary]) -> Self {
        Self {
            total_amount: rows.iter().fold(0.0, |total, row| total + row.total_amount),
            total_transactions: rows.iter().map(|row| row.transaction_count).sum(),
            category_count: rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_yields_no_filters() {
        let filters = TransactionListQuery::default().into_filters().unwrap();
        assert_eq!(filters, TransactionFilters::default());
    }

    #[test]
    fn test_query_is_parsed_into_typed_filters() {
        let query = TransactionListQuery {
            category_id: Some("3".to_string()),
            status: Some("approved".to_string()),
            date_from: Some("2024-01-01T00:00:00Z".to_string()),
            date_to: Some("2024-01-31T23:59:59+02:00".to_string()),
        };

        let filters = query.into_filters().unwrap();
        assert_eq!(filters.category_id, Some(3));
        assert_eq!(filters.status, Some(TransactionStatus::Approved));
        assert_eq!(
            filters.date_from.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(
            filters.date_to.unwrap().to_rfc3339(),
            "2024-01-31T21:59:59+00:00"
        );
    }

    #[test]
    fn test_every_bad_parameter_is_reported() {
        let query = TransactionListQuery {
            category_id: Some("food".to_string()),
            status: Some("archived".to_string()),
            date_from: Some("yesterday".to_string()),
            date_to: None,
        };

        let issues = query.into_filters().unwrap_err();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["categoryId", "status", "dateFrom"]);
    }

    #[test]
    fn test_summary_totals() {
        let rows = vec![
            ExpenseSummary {
                category_id: 1,
                category_name: "Food".to_string(),
                total_amount: 30.0,
                transaction_count: 2,
            },
            ExpenseSummary {
                category_id: 2,
                category_name: "Travel".to_string(),
                total_amount: 5.0,
                transaction_count: 1,
            },
        ];

        let totals = SummaryTotals::from_rows(&rows);
        assert_eq!(totals.total_amount, 35.0);
        assert_eq!(totals.total_transactions, 3);
        assert_eq!(totals.category_count, 2);
    }

    #[test]
    fn test_summary_totals_of_nothing() {
        let totals = SummaryTotals::from_rows(&[]);
        assert_eq!(totals.total_amount, 0.0);
        assert_eq!(totals.total_transactions, 0);
        assert_eq!(totals.category_count, 0);
    }
}
