use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failures raised by a [`crate::repository::TodoStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
    #[error("todo store is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Validation Error")]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid request body")]
    InvalidBody(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TodoError {
    pub fn not_found(id: &str) -> Self {
        TodoError::NotFound(format!("Todo not found with id: {}", id))
    }

    pub fn invalid_id(id: &str) -> Self {
        TodoError::NotFound(format!("Invalid todo ID: {}", id))
    }
}

/// Body shared by every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            errors: None,
        }
    }
}

impl ResponseError for TodoError {
    fn status_code(&self) -> StatusCode {
        match self {
            TodoError::Validation(_) | TodoError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            TodoError::Validation(errors) => ErrorResponse {
                errors: Some(errors.clone()),
                ..ErrorResponse::new(self.to_string())
            },
            TodoError::InvalidBody(reason) => ErrorResponse {
                errors: Some(vec![reason.clone()]),
                ..ErrorResponse::new(self.to_string())
            },
            TodoError::NotFound(message) => ErrorResponse::new(message.as_str()),
            TodoError::Store(err) => {
                tracing::error!(error = %err, "todo store failure");
                ErrorResponse {
                    error: Some(err.to_string()),
                    ..ErrorResponse::new("Server Error")
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: TodoError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_validation_envelope() {
        let (status, body) = body_of(TodoError::Validation(vec!["Please add a todo title".into()])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation Error");
        assert_eq!(body["errors"][0], "Please add a todo title");
        assert!(body.get("error").is_none());
    }

    #[actix_web::test]
    async fn test_not_found_envelope() {
        let (status, body) = body_of(TodoError::invalid_id("abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Invalid todo ID: abc");
        assert!(body.get("errors").is_none());
    }

    #[actix_web::test]
    async fn test_store_failure_envelope() {
        let err = TodoError::from(StoreError::Unavailable("lock poisoned".into()));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server Error");
        assert_eq!(body["error"], "todo store is unavailable: lock poisoned");
    }
}
