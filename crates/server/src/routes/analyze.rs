//! Routes backing the deck analyzer page.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    response::Json as ResponseJson,
    routing::post,
};
use serde_json::Value;
use services::services::scrollrack::ValidationResult;

use crate::{AppState, error::ApiError};

/// POST /api/analyze/validate
/// Check a decklist against Scrollrack with a single attempt.
///
/// The body is parsed by hand so that a missing or non-string `decklist`
/// gets the same 400 as an absent one instead of an extractor rejection.
pub async fn validate_decklist(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ResponseJson<ValidationResult>, ApiError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Unexpected(format!("invalid request body: {e}")))?;

    let decklist = payload
        .get("decklist")
        .and_then(Value::as_str)
        .ok_or(ApiError::MissingDecklist)?;

    if decklist.trim().is_empty() {
        return Err(ApiError::EmptyDecklist);
    }

    let result = state.validator().validate_decklist(decklist).await?;

    Ok(ResponseJson(result))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/analyze",
        Router::new().route("/validate", post(validate_decklist)),
    )
}
