//! Uniform JSON envelope returned by every REST operation.
//!
//! Success: `{success: true, data?, message?, meta?}`.
//! Failure: `{success: false, message, details?}`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::FieldIssue;

pub const CREATED_MESSAGE: &str = "Resource created successfully";
pub const UPDATED_MESSAGE: &str = "Resource updated successfully";
pub const DELETED_MESSAGE: &str = "Resource deleted successfully";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T, M = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

/// Failure envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

/// Meta attached to list responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CountMeta {
    pub count: usize,
}

pub fn success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data: Some(data),
        message: None,
        meta: None,
    }
}

pub fn success_with_meta<T, M>(data: T, meta: M) -> ApiResponse<T, M> {
    ApiResponse {
        success: true,
        data: Some(data),
        message: None,
        meta: Some(meta),
    }
}

pub fn created<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data: Some(data),
        message: Some(CREATED_MESSAGE.to_string()),
        meta: None,
    }
}

pub fn updated<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data: Some(data),
        message: Some(UPDATED_MESSAGE.to_string()),
        meta: None,
    }
}

pub fn deleted() -> ApiResponse<()> {
    message(DELETED_MESSAGE)
}

pub fn message(message: impl Into<String>) -> ApiResponse<()> {
    ApiResponse {
        success: true,
        data: None,
        message: Some(message.into()),
        meta: None,
    }
}

pub fn failure(message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        message: message.into(),
        details: None,
    }
}

pub fn failure_with_details(message: impl Into<String>, details: Vec<FieldIssue>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        message: message.into(),
        details: Some(details),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn to_json<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn test_success_omits_absent_fields() {
        assert_eq!(to_json(&success(vec![1, 2])), json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn test_success_with_meta() {
        let body = success_with_meta(vec!["a"], CountMeta { count: 1 });
        assert_eq!(
            to_json(&body),
            json!({ "success": true, "data": ["a"], "meta": { "count": 1 } })
        );
    }

    #[test]
    fn test_created_and_updated_carry_default_messages() {
        assert_eq!(to_json(&created(5))["message"], CREATED_MESSAGE);
        assert_eq!(to_json(&updated(5))["message"], UPDATED_MESSAGE);
    }

    #[test]
    fn test_deleted_has_no_data() {
        assert_eq!(
            to_json(&deleted()),
            json!({ "success": true, "message": "Resource deleted successfully" })
        );
    }

    #[test]
    fn test_failure_shapes() {
        assert_eq!(
            to_json(&failure("Category not found")),
            json!({ "success": false, "message": "Category not found" })
        );

        let body = failure_with_details(
            "Invalid request data",
            vec![FieldIssue::new("name", "too long")],
        );
        assert_eq!(
            to_json(&body),
            json!({
                "success": false,
                "message": "Invalid request data",
                "details": [{ "field": "name", "message": "too long" }]
            })
        );
    }
}
