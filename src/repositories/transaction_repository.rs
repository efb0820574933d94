use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::base::{self, KeyedTable};
use super::{RepositoryError, from_millis, to_millis, to_millis_ceil};
use crate::models::filters::{ExpenseSummary, TransactionFilters};
use crate::models::transaction::{
    NewTransaction, Transaction, TransactionStatus, TransactionWithCategory,
};

/// Name shown for transactions whose category has been deleted
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

/// Trait defining transaction repository operations
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// List transactions joined with their category name, newest first.
    /// All filters are combined with AND.
    async fn find_all(
        &self,
        filters: &TransactionFilters,
    ) -> Result<Vec<TransactionWithCategory>, RepositoryError>;

    /// Find a transaction by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>, RepositoryError>;

    /// Insert a transaction
    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, RepositoryError>;

    /// Overwrite the mutable fields of an existing transaction
    async fn update(&self, transaction: Transaction) -> Result<Transaction, RepositoryError>;

    /// Delete a transaction by ID
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Set the status of a transaction
    async fn update_status(&self, id: i64, status: TransactionStatus)
        -> Result<(), RepositoryError>;

    /// Sum and count transactions per category
    async fn expense_summary_by_category(&self) -> Result<Vec<ExpenseSummary>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    card_last_four: String,
    amount: f64,
    category_id: i64,
    transaction_date: i64,
    status: TransactionStatus,
    created_at: i64,
    updated_at: i64,
}

impl KeyedTable for TransactionRow {
    const TABLE: &'static str = "transactions";
    const COLUMNS: &'static str =
        "id, card_last_four, amount, category_id, transaction_date, status, created_at, updated_at";
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            id: row.id,
            card_last_four: row.card_last_four,
            amount: row.amount,
            category_id: row.category_id,
            transaction_date: from_millis(row.transaction_date),
            status: row.status,
            created_at: from_millis(row.created_at),
            updated_at: from_millis(row.updated_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionWithCategoryRow {
    id: i64,
    card_last_four: String,
    amount: f64,
    category_id: i64,
    category_name: Option<String>,
    transaction_date: i64,
    status: TransactionStatus,
    created_at: i64,
    updated_at: i64,
}

impl From<TransactionWithCategoryRow> for TransactionWithCategory {
    fn from(row: TransactionWithCategoryRow) -> Self {
        TransactionWithCategory {
            id: row.id,
            card_last_four: row.card_last_four,
            amount: row.amount,
            category_id: row.category_id,
            category_name: row
                .category_name
                .unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_string()),
            transaction_date: from_millis(row.transaction_date),
            status: row.status,
            created_at: from_millis(row.created_at),
            updated_at: from_millis(row.updated_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseSummaryRow {
    category_id: i64,
    category_name: Option<String>,
    total_amount: f64,
    transaction_count: i64,
}

impl From<ExpenseSummaryRow> for ExpenseSummary {
    fn from(row: ExpenseSummaryRow) -> Self {
        ExpenseSummary {
            category_id: row.category_id,
            category_name: row
                .category_name
                .unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_string()),
            total_amount: row.total_amount,
            transaction_count: row.transaction_count,
        }
    }
}

/// SQLite implementation of TransactionRepository
pub struct SqliteTransactionRepository {
    pool: SqlitePool,
}

impl SqliteTransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for SqliteTransactionRepository {
    async fn find_all(
        &self,
        filters: &TransactionFilters,
    ) -> Result<Vec<TransactionWithCategory>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                t.id,
                t.card_last_four,
                t.amount,
                t.category_id,
                c.name AS category_name,
                t.transaction_date,
                t.status,
                t.created_at,
                t.updated_at
            FROM transactions t
            LEFT JOIN categories c ON c.id = t.category_id
            WHERE 1 = 1
            "#,
        );

        if let Some(category_id) = filters.category_id {
            query.push(" AND t.category_id = ").push_bind(category_id);
        }

        if let Some(status) = filters.status {
            query.push(" AND t.status = ").push_bind(status);
        }

        // Date range is inclusive on both ends
        if let Some(date_from) = filters.date_from {
            query
                .push(" AND t.transaction_date >= ")
                .push_bind(to_millis_ceil(date_from));
        }

        if let Some(date_to) = filters.date_to {
            query
                .push(" AND t.transaction_date <= ")
                .push_bind(to_millis(date_to));
        }

        query.push(" ORDER BY t.transaction_date DESC, t.id DESC");

        let rows = query
            .build_query_as::<TransactionWithCategoryRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TransactionWithCategory::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>, RepositoryError> {
        let row = base::find_by_id::<TransactionRow>(&self.pool, id).await?;
        Ok(row.map(Transaction::from))
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, RepositoryError> {
        let now = to_millis(Utc::now());

        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO transactions (
                card_last_four, amount, category_id, transaction_date,
                status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, card_last_four, amount, category_id, transaction_date,
                      status, created_at, updated_at
            "#,
        )
        .bind(&transaction.card_last_four)
        .bind(transaction.amount)
        .bind(transaction.category_id)
        .bind(to_millis(transaction.transaction_date))
        .bind(transaction.status)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions
            SET card_last_four = ?,
                amount = ?,
                category_id = ?,
                transaction_date = ?,
                status = ?,
                updated_at = ?
            WHERE id = ?
            RETURNING id, card_last_four, amount, category_id, transaction_date,
                      status, created_at, updated_at
            "#,
        )
        .bind(&transaction.card_last_four)
        .bind(transaction.amount)
        .bind(transaction.category_id)
        .bind(to_millis(transaction.transaction_date))
        .bind(transaction.status)
        .bind(to_millis(Utc::now()))
        .bind(transaction.id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::from).ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        base::delete_by_id::<TransactionRow>(&self.pool, id).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: TransactionStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(to_millis(Utc::now()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn expense_summary_by_category(&self) -> Result<Vec<ExpenseSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ExpenseSummaryRow>(
            r#"
            SELECT
                t.category_id AS category_id,
                c.name AS category_name,
                CAST(SUM(t.amount) AS REAL) AS total_amount,
                COUNT(t.id) AS transaction_count
            FROM transactions t
            LEFT JOIN categories c ON c.id = t.category_id
            GROUP BY t.category_id, c.name
            ORDER BY t.category_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ExpenseSummary::from).collect())
    }
}
