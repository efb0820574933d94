use async_trait::async_trait;
use std::sync::Arc;

use crate::models::category::Category;
use crate::repositories::{CategoryRepository, RepositoryError};
use crate::services::error::{CATEGORY_NAME_TAKEN, ServiceError};
use crate::validation::validate_category_name;

/// Trait defining category service operations
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Get all categories
    async fn get_all(&self) -> Result<Vec<Category>, ServiceError>;

    /// Get a single category, failing with NotFound if it does not exist
    async fn get_by_id(&self, id: i64) -> Result<Category, ServiceError>;

    /// Create a category with a unique name
    async fn create(&self, name: &str) -> Result<Category, ServiceError>;

    /// Rename a category. Renaming to its current name is not a conflict.
    async fn update(&self, id: i64, name: &str) -> Result<Category, ServiceError>;

    /// Delete a category. Transactions that reference it are left in place.
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

/// Implementation of CategoryService
pub struct CategoryServiceImpl {
    category_repository: Arc<dyn CategoryRepository>,
}

impl CategoryServiceImpl {
    pub fn new(category_repository: Arc<dyn CategoryRepository>) -> Self {
        Self {
            category_repository,
        }
    }

    async fn ensure_exists(&self, id: i64) -> Result<(), ServiceError> {
        if !self
            .category_repository
            .exists(id)
            .await
            .map_err(category_error)?
        {
            return Err(ServiceError::category_not_found());
        }
        Ok(())
    }
}

fn category_error(error: RepositoryError) -> ServiceError {
    match error {
        RepositoryError::NotFound => ServiceError::category_not_found(),
        // Lost a race against a concurrent insert of the same name
        RepositoryError::ConstraintViolation(_) => {
            ServiceError::Conflict(CATEGORY_NAME_TAKEN.to_string())
        }
        RepositoryError::DatabaseError(msg) => ServiceError::Internal(msg),
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn get_all(&self) -> Result<Vec<Category>, ServiceError> {
        self.category_repository
            .find_all()
            .await
            .map_err(category_error)
    }

    async fn get_by_id(&self, id: i64) -> Result<Category, ServiceError> {
        self.category_repository
            .find_by_id(id)
            .await
            .map_err(category_error)?
            .ok_or_else(ServiceError::category_not_found)
    }

    async fn create(&self, name: &str) -> Result<Category, ServiceError> {
        validate_category_name(name)?;

        if self
            .category_repository
            .exists_by_name(name)
            .await
            .map_err(category_error)?
        {
            return Err(ServiceError::Conflict(CATEGORY_NAME_TAKEN.to_string()));
        }

        let category = self
            .category_repository
            .create(name)
            .await
            .map_err(category_error)?;

        tracing::info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    async fn update(&self, id: i64, name: &str) -> Result<Category, ServiceError> {
        validate_category_name(name)?;
        self.ensure_exists(id).await?;

        if self
            .category_repository
            .exists_excluding(id, name)
            .await
            .map_err(category_error)?
        {
            return Err(ServiceError::Conflict(CATEGORY_NAME_TAKEN.to_string()));
        }

        let category = self
            .category_repository
            .update(id, name)
            .await
            .map_err(category_error)?;

        tracing::info!(category_id = id, name = %category.name, "Category renamed");
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;

        self.category_repository
            .delete(id)
            .await
            .map_err(category_error)?;

        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }
}
