//! Status classification and JSON envelopes for API responses.
//!
//! # Invariants
//! - Every response body is valid JSON.
//! - Failures carry `{ "error": "<message>" }`.
//! - `5xx` responses are logged at error level, `4xx` at warn level.

use log::{error, warn};
use serde::Serialize;
use serde_json::json;
use studyplan_core::{PaginationError, ParseGranularityError, RepoError, ServiceError};

const SERIALIZE_FAILURE_BODY: &str = r#"{"error":"failed to serialize response"}"#;

/// Transport-agnostic response: HTTP-like status plus a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body back into JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub(crate) fn with_json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(err) => {
                error!(
                    "event=api_respond module=api status=error error_code=serialize_failed error={err}"
                );
                Self {
                    status: 500,
                    body: SERIALIZE_FAILURE_BODY.to_string(),
                }
            }
        }
    }
}

/// Classified failure of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    fn text(&self) -> &str {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) | Self::Internal(message) => {
                message
            }
        }
    }

    pub(crate) fn into_response(self, op: &'static str) -> ApiResponse {
        let status = self.status();
        if status >= 500 {
            error!(
                "event=api_call module=api status=error op={op} http_status={status} error={}",
                self.text()
            );
        } else {
            warn!(
                "event=api_call module=api status=rejected op={op} http_status={status} error={}",
                self.text()
            );
        }
        ApiResponse::with_json(status, &json!({ "error": self.text() }))
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => Self::BadRequest(err.to_string()),
            ServiceError::NotFound { .. } => Self::NotFound(value.to_string()),
            ServiceError::Repo(err) => Self::from(err),
            ServiceError::InconsistentState(_) => Self::Internal(value.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { .. } => Self::NotFound(value.to_string()),
            _ => Self::Internal(value.to_string()),
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(value: PaginationError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl From<ParseGranularityError> for ApiError {
    fn from(value: ParseGranularityError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::BadRequest(format!("malformed JSON body: {value}"))
    }
}

impl From<uuid::Error> for ApiError {
    fn from(value: uuid::Error) -> Self {
        Self::BadRequest(format!("invalid id: {value}"))
    }
}

/// Runs `call` and renders its outcome with `status` on success.
pub(crate) fn respond<T: Serialize>(
    op: &'static str,
    status: u16,
    call: impl FnOnce() -> Result<T, ApiError>,
) -> ApiResponse {
    match call() {
        Ok(value) => ApiResponse::with_json(status, &value),
        Err(err) => err.into_response(op),
    }
}

#[cfg(test)]
mod tests {
    use super::{respond, ApiError, ApiResponse};
    use studyplan_core::{PaginationError, ServiceError, ValidationError};

    #[test]
    fn errors_map_to_client_and_server_statuses() {
        let validation: ApiError =
            ServiceError::Validation(ValidationError::BlankField("title")).into();
        assert_eq!(validation.into_response("test").status, 400);

        let paging: ApiError = PaginationError::InvalidArgument("limit".to_string()).into();
        assert_eq!(paging.into_response("test").status, 400);

        let missing: ApiError = ServiceError::NotFound {
            entity: "note",
            id: "7".to_string(),
        }
        .into();
        let response = missing.into_response("test");
        assert_eq!(response.status, 404);
        assert_eq!(response.json().unwrap()["error"], "note not found: 7");

        let broken: ApiError = ServiceError::InconsistentState("read-back").into();
        assert_eq!(broken.into_response("test").status, 500);
    }

    #[test]
    fn respond_serializes_success_value() {
        let response = respond("test", 201, || Ok(vec![1, 2]));
        assert_eq!(
            response,
            ApiResponse {
                status: 201,
                body: "[1,2]".to_string()
            }
        );
        assert!(response.is_success());
    }
}
