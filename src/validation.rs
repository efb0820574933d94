//! Field rules shared by the service layer and both transports.
//!
//! The `validate_*` functions are the business-rule checks the services run
//! before touching storage. The lower-case hooks further down plug the same
//! rules into `validator` derives so request payloads are rejected with a
//! structured issue list before a service is ever called.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::services::error::ServiceError;

pub const CARD_LAST_FOUR_MESSAGE: &str = "Card number must be exactly 4 digits";
pub const AMOUNT_MESSAGE: &str = "Amount must be greater than 0";
pub const CATEGORY_NAME_MESSAGE: &str = "Category name must be between 1 and 100 characters";

pub const CATEGORY_NAME_MAX_CHARS: usize = 100;

/// Returns true when `value` is exactly four ASCII digits.
pub fn is_card_last_four(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a raw identifier taken from a path segment.
///
/// `resource_name` is embedded in the message, e.g. "Invalid category ID".
pub fn validate_id(raw: &str, resource_name: &str) -> Result<i64, ServiceError> {
    raw.parse::<i64>()
        .map_err(|_| ServiceError::Validation(format!("Invalid {}", resource_name)))
}

pub fn validate_card_last_four(card_last_four: &str) -> Result<(), ServiceError> {
    if !is_card_last_four(card_last_four) {
        return Err(ServiceError::Validation(CARD_LAST_FOUR_MESSAGE.to_string()));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<(), ServiceError> {
    // NaN fails this check too
    if !(amount > 0.0) {
        return Err(ServiceError::Validation(AMOUNT_MESSAGE.to_string()));
    }
    Ok(())
}

/// Name length is counted in characters. Whitespace is not trimmed.
pub fn validate_category_name(name: &str) -> Result<(), ServiceError> {
    let length = name.chars().count();
    if length < 1 || length > CATEGORY_NAME_MAX_CHARS {
        return Err(ServiceError::Validation(CATEGORY_NAME_MESSAGE.to_string()));
    }
    Ok(())
}

/// `validator` hook: card digits on request payloads
pub fn card_last_four_format(card_last_four: &str) -> Result<(), ValidationError> {
    if is_card_last_four(card_last_four) {
        return Ok(());
    }
    let mut error = ValidationError::new("card_last_four");
    error.message = Some(CARD_LAST_FOUR_MESSAGE.into());
    Err(error)
}

/// `validator` hook: strictly positive amount on request payloads
pub fn positive_amount(amount: f64) -> Result<(), ValidationError> {
    if amount > 0.0 {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_amount");
    error.message = Some(AMOUNT_MESSAGE.into());
    Err(error)
}

/// One schema-level problem with a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flattens `validator` output into an issue list, one entry per failed
/// rule, sorted by field so responses are stable.
///
/// Field names are reported in the camelCase form used on the wire.
pub fn collect_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            let field = camel_case(field);
            errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldIssue::new(field.clone(), message)
            })
        })
        .collect();
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    issues
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for c in snake.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
