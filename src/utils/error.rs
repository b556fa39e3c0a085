use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::database::StoreError;
use crate::recognizer::RecognizerError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    /// Same message for every cause so callers cannot probe which emails exist.
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Store(#[from] StoreError),
    #[error("Error in face recognition process: {0}")]
    Recognizer(#[from] RecognizerError),
    #[error("{0}")]
    Internal(String),
    #[error("Service not ready: {0}")]
    NotReady(String),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    /// Message sent to the client. Dependency failures are not echoed verbatim.
    fn public_message(&self) -> String {
        match self {
            AppError::Store(StoreError::Duplicate) => "Record already exists".to_string(),
            AppError::Store(_) => "Internal Server Error".to_string(),
            AppError::Recognizer(_) => "Error in face recognition process".to_string(),
            AppError::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store(StoreError::Duplicate) => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Recognizer(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("❌ {}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.public_message()
        }))
    }
}
