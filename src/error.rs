use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    /// The LLM answered, but not in a shape we could extract anything from.
    /// `raw` keeps the response text so the caller can show it for diagnosis.
    #[error("Parse error: {message}")]
    Parse { message: String, raw: String },

    /// A single metadata lookup found nothing. Never fails a whole batch.
    #[error("Lookup miss: {0}")]
    LookupMiss(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        AppError::Parse {
            message: message.into(),
            raw: raw.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) | AppError::LookupMiss(msg) => {
                (StatusCode::NOT_FOUND, json!({ "error": msg }))
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Cache(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, json!({ "error": msg })),
            AppError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, json!({ "error": self.to_string() }))
            }
            AppError::Parse { message, raw } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "raw": raw }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
