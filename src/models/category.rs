use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Named grouping for card transactions. Names are unique as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "name": "Office Supplies" }))]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"))]
    #[schema(min_length = 1, max_length = 100)]
    pub name: String,
}

/// Request payload for renaming a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "name": "Travel Expenses" }))]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"))]
    #[schema(min_length = 1, max_length = 100)]
    pub name: String,
}
