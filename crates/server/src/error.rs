use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use services::services::scrollrack::ScrollrackError;
use thiserror::Error;
use ts_rs::TS;

/// JSON body of every error response from the analyze routes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Decklist is required")]
    MissingDecklist,
    #[error("Decklist cannot be empty")]
    EmptyDecklist,
    #[error(transparent)]
    Validator(#[from] ScrollrackError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::MissingDecklist | ApiError::EmptyDecklist => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: self.to_string(),
                    details: None,
                },
            ),
            // A 2xx we cannot read is our problem, not the validator's verdict.
            ApiError::Validator(ScrollrackError::Decode(_)) | ApiError::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Failed to validate decklist".to_string(),
                    details: None,
                },
            ),
            ApiError::Validator(e) => (
                e.status_code()
                    .and_then(|status| StatusCode::from_u16(status).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                ErrorResponse {
                    error: "Validation service error".to_string(),
                    details: Some(e.to_string()),
                },
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        match &self {
            ApiError::MissingDecklist | ApiError::EmptyDecklist => {
                tracing::debug!(error = %self, "Rejected validation request");
            }
            ApiError::Validator(e) => {
                tracing::error!(
                    error = %e,
                    status = ?e.status_code(),
                    body = ?e.response_body(),
                    "Validation error"
                );
            }
            ApiError::Unexpected(_) => tracing::error!(error = %self, "Validation error"),
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use services::services::scrollrack::ErrorBody;

    use super::*;

    #[test]
    fn validator_status_passes_through() {
        let err = ApiError::from(ScrollrackError::Http {
            status: 422,
            status_text: "Unprocessable Entity".into(),
            body: ErrorBody::Text(String::new()),
        });
        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "Validation service error");
        assert_eq!(
            body.details.as_deref(),
            Some("Scrollrack API error: 422 Unprocessable Entity")
        );
    }

    #[test]
    fn unreachable_validator_defaults_to_500() {
        let (status, body) = ApiError::from(ScrollrackError::Timeout).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Validation service error");
        assert_eq!(body.details.as_deref(), Some("timeout"));
    }

    #[test]
    fn decode_failure_is_generic() {
        let (status, body) =
            ApiError::from(ScrollrackError::Decode("expected value".into())).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to validate decklist");
        assert!(body.details.is_none());
    }
}
