use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::base::{self, KeyedTable};
use super::{RepositoryError, from_millis, to_millis};
use crate::models::category::Category;

/// Trait defining category repository operations
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find all categories, ordered by id
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Find a category by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepositoryError>;

    /// Insert a category; storage assigns the id and timestamps
    async fn create(&self, name: &str) -> Result<Category, RepositoryError>;

    /// Rename a category and bump `updated_at`
    async fn update(&self, id: i64, name: &str) -> Result<Category, RepositoryError>;

    /// Delete a category by ID
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Whether a category with this ID exists
    async fn exists(&self, id: i64) -> Result<bool, RepositoryError>;

    /// Whether any category already uses this exact name
    async fn exists_by_name(&self, name: &str) -> Result<bool, RepositoryError>;

    /// Whether a category other than `id` already uses this exact name
    async fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    created_at: i64,
    updated_at: i64,
}

impl KeyedTable for CategoryRow {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static str = "id, name, created_at, updated_at";
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            created_at: from_millis(row.created_at),
            updated_at: from_millis(row.updated_at),
        }
    }
}

/// SQLite implementation of CategoryRepository
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn unique_name_violation(error: sqlx::Error) -> RepositoryError {
    match error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::ConstraintViolation(
                "Category with this name already exists".to_string(),
            )
        }
        e => RepositoryError::from(e),
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = base::find_all::<CategoryRow>(&self.pool).await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepositoryError> {
        let row = base::find_by_id::<CategoryRow>(&self.pool, id).await?;
        Ok(row.map(Category::from))
    }

    async fn create(&self, name: &str) -> Result<Category, RepositoryError> {
        let now = to_millis(Utc::now());

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name, created_at, updated_at)
            VALUES (?, ?, ?)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_name_violation)?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, name: &str) -> Result<Category, RepositoryError> {
        let now = to_millis(Utc::now());

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET name = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unique_name_violation)?;

        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        base::delete_by_id::<CategoryRow>(&self.pool, id).await
    }

    async fn exists(&self, id: i64) -> Result<bool, RepositoryError> {
        base::exists::<CategoryRow>(&self.pool, id).await
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepositoryError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(found != 0)
    }

    async fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ? AND id <> ?)",
        )
        .bind(name)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found != 0)
    }
}
