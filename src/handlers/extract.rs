use axum::{
    Json,
    async_trait,
    extract::{
        FromRequest,
        FromRequestParts,
        Query,
        Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::handlers::error::ApiError;
use crate::validation::{FieldIssue, collect_issues};

/// JSON body that has been deserialized and passed its `validator` rules.
///
/// Malformed JSON and rule failures are both rejected with
/// [`ApiError::InvalidRequest`], so handlers only ever see valid payloads.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(body_issue)?;

        value
            .validate()
            .map_err(|errors| ApiError::InvalidRequest(collect_issues(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn body_issue(rejection: JsonRejection) -> ApiError {
    ApiError::InvalidRequest(vec![FieldIssue::new("body", rejection.body_text())])
}

/// Query string deserialized into `T`, rejected with
/// [`ApiError::InvalidRequest`] when it does not fit.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_issue)?;
        Ok(QueryParams(value))
    }
}

fn query_issue(rejection: QueryRejection) -> ApiError {
    ApiError::InvalidRequest(vec![FieldIssue::new("query", rejection.body_text())])
}
