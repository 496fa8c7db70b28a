use axum::Json;
use axum::extract::path::ErrorKind;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::task::TaskServiceError;

/// Uniform problem-description body returned for every failure condition.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetail {
    /// HTTP status code of the failure
    pub status: u16,
    /// Short human-readable summary of the failure kind
    pub title: String,
    /// Human-readable explanation of this occurrence
    pub detail: String,
    /// Instant at which the failure was translated
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Field-level validation messages, present for validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ProblemDetail {
    fn new(status: StatusCode, title: &str, detail: String) -> Self {
        Self {
            status: status.as_u16(),
            title: title.to_string(),
            detail,
            timestamp: chrono::Utc::now(),
            errors: None,
        }
    }
}

/// Error type for API handler operations. Every failure a handler can
/// produce is translated here into a [`ProblemDetail`] response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents a missing task.
    #[error("Task not found with id: {0}")]
    NotFound(i64),
    /// Represents a payload that failed field validation.
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),
    /// Represents a parameter that could not be parsed into its expected type.
    #[error("Invalid value '{value}' for parameter '{name}'")]
    InvalidParameter { name: String, value: String },
    /// Represents a generic invalid argument from the caller.
    #[error("{0}")]
    InvalidArgument(String),
    /// Represents any unhandled failure. The source is logged, never exposed.
    #[error("An unexpected error occurred")]
    Internal(#[source] anyhow::Error),
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::TaskNotFound(id) => ApiError::NotFound(id),
            TaskServiceError::Database(err) => ApiError::Internal(err.into()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(inner) => match inner.into_kind() {
                ErrorKind::ParseErrorAtKey { key, value, .. } => {
                    ApiError::InvalidParameter { name: key, value }
                }
                // The task id is the only path parameter in this API.
                ErrorKind::ParseError { value, .. } => ApiError::InvalidParameter {
                    name: "id".to_string(),
                    value,
                },
                kind => ApiError::InvalidArgument(kind.to_string()),
            },
            rejection => ApiError::InvalidArgument(rejection.body_text()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, title) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Task Not Found"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            ApiError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, "Invalid Parameter"),
            ApiError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "Invalid Request"),
            ApiError::Internal(err) => {
                tracing::error!("Unhandled error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let mut problem = ProblemDetail::new(status, title, self.to_string());
        if let ApiError::Validation(errors) = self {
            problem.errors = Some(errors);
        }

        (status, Json(problem)).into_response()
    }
}
