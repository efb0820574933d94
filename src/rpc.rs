//! RPC surface: `POST /rpc/{procedure}` with the procedure input as the JSON
//! body. Successful calls answer 200 with the procedure output as the body.

pub mod error;
pub mod procedures;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde_json::Value;

pub use error::RpcError;
pub use procedures::Procedure;

use crate::state::AppState;
use crate::validation::FieldIssue;

/// Dispatches a named procedure. An empty body means "no input".
pub async fn rpc_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, RpcError> {
    let procedure: Procedure = name.parse()?;

    let input = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| RpcError::BadInput(vec![FieldIssue::new("input", e.to_string())]))?
    };

    tracing::debug!(%procedure, "RPC call");
    let output = procedure.call(&state, input).await?;
    Ok(Json(output))
}
