use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Fixed message for statements refused by the query guard. The offending
/// keyword is never echoed back.
pub const QUERY_BLOCKED_MESSAGE: &str = "Operation not allowed for security reasons";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Query rejected by guard")]
    QueryRejected,

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthenticated() -> Self {
        AppError::Auth("Authentication failed".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::QueryRejected => StatusCode::BAD_REQUEST,
            AppError::QueryFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) | AppError::UpstreamStatus(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to the caller. Store, upstream and engine details
    /// are logged here and replaced by a generic message.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }
            AppError::Auth(ref msg) => msg.clone(),
            AppError::Validation(ref msg) => msg.clone(),
            AppError::QueryRejected => QUERY_BLOCKED_MESSAGE.to_string(),
            AppError::QueryFailed(ref detail) => {
                tracing::warn!("Guarded query failed in engine: {}", detail);
                "Database error occurred".to_string()
            }
            AppError::Upstream(ref e) => {
                tracing::error!("Upstream error: {}", e);
                "Upstream service error".to_string()
            }
            AppError::UpstreamStatus(code) => {
                tracing::error!("Upstream returned status {}", code);
                "Upstream service error".to_string()
            }
            AppError::Config(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::NotFound => "Resource not found".to_string(),
            AppError::Forbidden => "Access forbidden".to_string(),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                "Internal server error".to_string()
            }
        }
    }

    /// JSON error envelope; the gateway extends it with usage annotations.
    pub fn body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(false));
        body.insert("message".to_string(), Value::String(self.public_message()));
        body.insert("status".to_string(), json!(self.status().as_u16()));
        body
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(Value::Object(self.body()))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
