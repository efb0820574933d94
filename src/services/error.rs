use crate::repositories::RepositoryError;

pub const CATEGORY_NOT_FOUND: &str = "Category not found";
pub const TRANSACTION_NOT_FOUND: &str = "Transaction not found";
pub const CATEGORY_NAME_TAKEN: &str = "Category with this name already exists";

/// Coarse classification of a [`ServiceError`].
///
/// Transports translate a kind into their own status codes; the mapping is
/// an exhaustive `match`, so adding a kind forces every transport to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

/// Errors raised by the domain services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule would be broken
    #[error("{0}")]
    Conflict(String),

    /// Anything unanticipated, usually storage failures
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn category_not_found() -> Self {
        ServiceError::NotFound(CATEGORY_NOT_FOUND.to_string())
    }

    pub fn transaction_not_found() -> Self {
        ServiceError::NotFound(TRANSACTION_NOT_FOUND.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => ServiceError::NotFound(error.to_string()),
            RepositoryError::ConstraintViolation(msg) => ServiceError::Conflict(msg),
            RepositoryError::DatabaseError(msg) => ServiceError::Internal(msg),
        }
    }
}
