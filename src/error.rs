use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to decode URL: {0}")]
    Decode(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Failure of an external data source. Never crosses a feature rule boundary.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("too many redirects (limit {0})")]
    TooManyRedirects(usize),

    #[error("unparseable response: {0}")]
    Parse(String),

    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidInput(_) | AppError::Decode(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            _ => {
                tracing::error!("Internal server error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process URL".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

pub fn validation_error(msg: &str) -> AppError {
    AppError::InvalidInput(msg.to_string())
}
