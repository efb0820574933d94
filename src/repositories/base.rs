//! Basic CRUD over a table keyed by an integer `id` column.
//!
//! Concrete repositories describe their row type with [`KeyedTable`] and
//! reuse these helpers for the by-id operations. Inserts and updates stay in
//! the repositories because their column lists differ.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use super::RepositoryError;

/// A row type stored in a table with an integer primary key named `id`
pub trait KeyedTable: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// Table name, trusted and interpolated into SQL
    const TABLE: &'static str;
    /// Comma separated column list matching the `FromRow` fields
    const COLUMNS: &'static str;
}

pub async fn find_by_id<T: KeyedTable>(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<T>, RepositoryError> {
    let query = format!("SELECT {} FROM {} WHERE id = ? LIMIT 1", T::COLUMNS, T::TABLE);
    let row = sqlx::query_as::<_, T>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all<T: KeyedTable>(pool: &SqlitePool) -> Result<Vec<T>, RepositoryError> {
    let query = format!("SELECT {} FROM {} ORDER BY id ASC", T::COLUMNS, T::TABLE);
    let rows = sqlx::query_as::<_, T>(&query).fetch_all(pool).await?;
    Ok(rows)
}

/// Deletes the row, failing with `NotFound` when nothing was removed
pub async fn delete_by_id<T: KeyedTable>(pool: &SqlitePool, id: i64) -> Result<(), RepositoryError> {
    let query = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
    let result = sqlx::query(&query).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn exists<T: KeyedTable>(pool: &SqlitePool, id: i64) -> Result<bool, RepositoryError> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", T::TABLE);
    let found = sqlx::query_scalar::<_, i64>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found != 0)
}
