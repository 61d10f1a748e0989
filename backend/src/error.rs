//! HTTP-facing error type. Every JSON handler returns `Result<T, ApiError>`,
//! rendered as `{"error": "..."}` with a matching status code.
//!
//! Store failures are logged in full and reported with a generic message.
//! Upstream model failures carry their own message through to the caller.

use crate::dbs::DbError;
use crate::services::admin::AdminError;
use crate::services::chat::ChatError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// A language-model call failed
    #[error("{0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
            ApiError::Upstream(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
            ApiError::Internal(m) => {
                tracing::error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(m) => ApiError::NotFound(m),
            DbError::Conflict(_) => {
                ApiError::Conflict("A character with this name already exists.".to_owned())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Upstream(e) => ApiError::Upstream(e.to_string()),
            ChatError::Database(e) => e.into(),
            client => ApiError::BadRequest(client.to_string()),
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(e: AdminError) -> Self {
        match e {
            AdminError::EmptyName => ApiError::BadRequest(e.to_string()),
            AdminError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;

    #[test]
    fn chat_errors_map_to_status_codes() {
        let status = |e: ChatError| ApiError::from(e).into_response().status();

        assert_eq!(status(ChatError::MissingMessage), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ChatError::UnknownCharacter {
                name: "Nobody".to_string(),
                available: vec![],
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(ChatError::Upstream(LlmError::Other("boom".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn model_timeout_is_an_upstream_server_error() {
        let err = ApiError::from(ChatError::Upstream(LlmError::Timeout(
            std::time::Duration::from_secs(60),
        )));
        assert!(matches!(&err, ApiError::Upstream(m) if m.contains("did not answer")));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_hide_details() {
        let err = ApiError::from(DbError::Internal("disk I/O error".to_string()));
        assert!(matches!(err, ApiError::Internal(_)));

        let err = ApiError::from(DbError::Conflict("UNIQUE constraint failed".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
