use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::{failure, failure_with_details};
use crate::services::error::{ErrorKind, ServiceError};
use crate::validation::FieldIssue;

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request data";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const ENDPOINT_NOT_FOUND_MESSAGE: &str = "Endpoint not found";

/// Everything a REST handler can fail with
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body, path or query did not match the expected shape
    #[error("Invalid request data")]
    InvalidRequest(Vec<FieldIssue>),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(error) => status_for(error.kind()),
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert ApiError to HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::InvalidRequest(issues) => {
                failure_with_details(INVALID_REQUEST_MESSAGE, issues)
            }
            ApiError::Service(ServiceError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                failure(INTERNAL_ERROR_MESSAGE)
            }
            ApiError::Service(error) => failure(error.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// Fallback for unmatched routes
pub async fn endpoint_not_found() -> ApiError {
    ApiError::Service(ServiceError::NotFound(
        ENDPOINT_NOT_FOUND_MESSAGE.to_string(),
    ))
}
