use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::error::{ErrorKind, ServiceError};
use crate::validation::FieldIssue;

pub const PROCEDURE_NOT_FOUND_MESSAGE: &str = "Procedure not found";
pub const INPUT_VALIDATION_MESSAGE: &str = "Input validation failed";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Wire shape of a failed procedure call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorBody {
    pub code: String,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Everything a procedure call can fail with
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Procedure not found: {0}")]
    UnknownProcedure(String),

    /// Input did not match the procedure's schema
    #[error("Input validation failed")]
    BadInput(Vec<FieldIssue>),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::UnknownProcedure(_) => StatusCode::NOT_FOUND,
            RpcError::BadInput(_) => StatusCode::BAD_REQUEST,
            RpcError::Service(error) => match error.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Machine readable code, derived from the status
    pub fn code(&self) -> &'static str {
        match self.status() {
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::CONFLICT => "CONFLICT",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn into_body(self) -> RpcErrorBody {
        let status = self.status();
        let code = self.code().to_string();

        let (message, data) = match self {
            RpcError::UnknownProcedure(name) => (
                PROCEDURE_NOT_FOUND_MESSAGE.to_string(),
                Some(serde_json::json!({ "procedure": name })),
            ),
            RpcError::BadInput(issues) => (
                INPUT_VALIDATION_MESSAGE.to_string(),
                Some(serde_json::json!({ "issues": issues })),
            ),
            RpcError::Service(ServiceError::Internal(msg)) => {
                tracing::error!("Internal error in procedure call: {}", msg);
                (INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
            RpcError::Service(error) => (error.to_string(), None),
        };

        RpcErrorBody {
            code,
            status: status.as_u16(),
            message,
            data,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}
