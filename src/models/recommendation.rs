use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CatalogEntry;

/// Body of POST /api/ai-recommend
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// A title suggested by the language model, before catalog lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub title: String,
    pub reason: String,
}

/// A suggestion together with its catalog matches (possibly none)
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    pub title: String,
    pub reason: String,
    pub api: Vec<CatalogEntry>,
}

/// Emitted when no suggestion matched anything in the catalog
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackResult {
    pub fallback: bool,
    pub query: String,
    pub reason: String,
    /// Raw catalog search response for the original query, `null` if that
    /// search failed too
    pub fallback_data: Option<Value>,
}

/// Response of the recommendation endpoint: either matched results or the
/// fallback search, never both
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecommendationResponse {
    Results { results: Vec<RecommendationResult> },
    Fallback(FallbackResult),
}

impl RecommendationResponse {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RecommendationResponse::Fallback(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_results_shape() {
        let response = RecommendationResponse::Results {
            results: vec![RecommendationResult {
                title: "Vinland Saga".to_string(),
                reason: "Historical epic.".to_string(),
                api: vec![],
            }],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({ "results": [{ "title": "Vinland Saga", "reason": "Historical epic.", "api": [] }] })
        );
        assert!(!response.is_fallback());
    }

    #[test]
    fn test_fallback_shape() {
        let response = RecommendationResponse::Fallback(FallbackResult {
            fallback: true,
            query: "sad robots".to_string(),
            reason: "nothing matched".to_string(),
            fallback_data: None,
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["fallback"], true);
        assert_eq!(value["query"], "sad robots");
        assert!(value["fallbackData"].is_null());
        assert!(value.get("results").is_none());
        assert!(response.is_fallback());
    }

    #[test]
    fn test_request_query_optional() {
        let request: RecommendationRequest = serde_json::from_str("{}").unwrap();
        assert!(request.query.is_none());

        let request: RecommendationRequest = serde_json::from_str(r#"{"query": null}"#).unwrap();
        assert!(request.query.is_none());
    }
}
