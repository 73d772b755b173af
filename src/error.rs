use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::generator::GenerationError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Proxy fetch failed: {0}")]
    ProxyFetch(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ProxyFetch(_) => {
                tracing::error!(error = %self, "Proxy request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Fetch failed".to_string())
            }
            AppError::ExternalApi(_) | AppError::HttpClient(_) => {
                tracing::error!(error = %self, "Catalog request failed");
                (StatusCode::BAD_GATEWAY, "Upstream unavailable".to_string())
            }
            AppError::Generation(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_input_keeps_message() {
        let (status, body) = render(AppError::InvalidInput("missing query".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "missing query" }));
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let (status, body) = render(AppError::Internal("secret stack trace".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal" }));
    }

    #[tokio::test]
    async fn test_generation_failure_is_internal() {
        let error = AppError::from(GenerationError::Exhausted {
            models: vec!["gemini-2.5-flash".to_string()],
        });
        let (status, body) = render(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal" }));
    }

    #[tokio::test]
    async fn test_proxy_failure_body() {
        let (status, body) = render(AppError::ProxyFetch("connection refused".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Fetch failed" }));
    }

    #[tokio::test]
    async fn test_catalog_failure_is_bad_gateway() {
        let (status, body) = render(AppError::ExternalApi("status 503".to_string())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({ "error": "Upstream unavailable" }));
    }
}
