use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::storage::StorageError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error")]
    StorageError(#[source] StorageError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::StorageError(_) => "STORAGE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::NotFound(msg) => debug!(message = %msg, "Resource not found"),
            AppError::ValidationError(msg) => {
                warn!(message = %msg, "Rejected request");
            }
            AppError::StorageError(e) => {
                error!(error = ?e, "Storage error");
            }
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{entity_type} with id '{id}' was not found"))
            }
            other => AppError::StorageError(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Only expose high-level message to the client
        let public_message = match self {
            // Missing resources are answered with a bare status
            AppError::NotFound(_) => return status.into_response(),
            AppError::ValidationError(msg) => msg,
            AppError::StorageError(_) => "A storage error occurred".to_string(),
        };

        error_response(code, public_message, None, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        let response = AppError::NotFound("event".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_validation_error_uses_envelope() {
        let response = AppError::ValidationError("bad body".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], "bad body");
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let err = AppError::from(StorageError::AlreadyExists {
            entity_type: "Event",
            id: Uuid::nil(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["message"], "A storage error occurred");
    }

    #[tokio::test]
    async fn test_value_too_long_is_500_without_details() {
        let err = AppError::from(StorageError::ValueTooLong {
            column: "description",
            len: 201,
            max: 200,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "STORAGE_ERROR");
        assert_eq!(json["error"]["message"], "A storage error occurred");
    }

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let err = AppError::from(StorageError::NotFound {
            entity_type: "Event",
            id: Uuid::nil(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
