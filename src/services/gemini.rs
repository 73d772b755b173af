//! Gemini `generateContent` client.

use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

use crate::services::generator::{GenerationError, LanguageModel};

/// Largest error body kept for logging
const MAX_ERROR_BODY_BYTES: usize = 4096;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, empty if there is none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: api_key.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_url, model)
    }
}

/// Map a failed response onto the structured error taxonomy
///
/// Overload is HTTP 503 or an `UNAVAILABLE` status in the error body.
fn classify_error(status: StatusCode, body: &str) -> GenerationError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let code = parsed.as_ref().and_then(|e| e.error.status.clone());
    let message = parsed
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.to_string());

    if status == StatusCode::SERVICE_UNAVAILABLE || code.as_deref() == Some("UNAVAILABLE") {
        return GenerationError::Overloaded { status, message };
    }

    GenerationError::Api {
        status,
        code,
        message,
    }
}

#[async_trait::async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let limit = bytes.len().min(MAX_ERROR_BODY_BYTES);
            let body = String::from_utf8_lossy(&bytes[..limit]).to_string();
            return Err(classify_error(status, &body));
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        let client = GeminiClient::new("key", "https://generativelanguage.googleapis.com/");
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "contents": [{ "parts": [{ "text": "hello" }] }] })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "1. **Berserk**: " }, { "text": "Dark." }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "1. **Berserk**: Dark.");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");

        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_503_is_overload() {
        let body = r#"{"error": {"code": 503, "message": "The model is overloaded. Please try again later.", "status": "UNAVAILABLE"}}"#;
        let err = classify_error(StatusCode::SERVICE_UNAVAILABLE, body);
        assert!(err.is_retryable());
        match err {
            GenerationError::Overloaded { message, .. } => {
                assert_eq!(message, "The model is overloaded. Please try again later.")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_status_is_overload_regardless_of_code() {
        let body = r#"{"error": {"code": 500, "message": "try later", "status": "UNAVAILABLE"}}"#;
        assert!(classify_error(StatusCode::INTERNAL_SERVER_ERROR, body).is_retryable());
    }

    #[test]
    fn test_overload_wording_alone_is_not_retryable() {
        let body = r#"{"error": {"code": 400, "message": "request overloaded with parts", "status": "INVALID_ARGUMENT"}}"#;
        let err = classify_error(StatusCode::BAD_REQUEST, body);
        assert!(!err.is_retryable());
        match err {
            GenerationError::Api { code, .. } => assert_eq!(code.as_deref(), Some("INVALID_ARGUMENT")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_json_error_body_kept_as_message() {
        let err = classify_error(StatusCode::FORBIDDEN, "<html>denied</html>");
        match err {
            GenerationError::Api { message, code, .. } => {
                assert_eq!(message, "<html>denied</html>");
                assert_eq!(code, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
