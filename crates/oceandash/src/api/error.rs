//! Mapping of crate errors onto HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::{Error, ValidationError, ViolationKind};
use crate::model::validate::BODY_FIELD;

/// Result type for request handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// An error returned from a request handler.
///
/// Validation failures become `422` with the field list under `detail`.
/// Everything else is a `500` carrying the underlying message.
#[derive(Debug)]
pub struct ApiError(Error);

impl ApiError {
    /// A request body that is not JSON, or not sent as JSON.
    #[must_use]
    pub fn body_rejected(rejection: &JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected request body");
        Self(
            ValidationError::single(
                BODY_FIELD,
                ViolationKind::WrongType,
                "expected a JSON request body",
            )
            .into(),
        )
    }

    /// A query string that could not be decoded.
    #[must_use]
    pub fn query_rejected(rejection: &QueryRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected query string");
        Self(
            ValidationError::single("query", ViolationKind::WrongType, "malformed query string")
                .into(),
        )
    }

    /// `422` for validation failures, `500` for everything else.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.0.is_validation() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self.0 {
            Error::Validation(violations) => json!(violations),
            err => {
                if err.is_storage() {
                    error!(error = %err, "Document store call failed");
                } else {
                    error!(error = %err, "Request failed");
                }
                json!(err.to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
