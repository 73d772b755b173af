//! Resolves parsed suggestions against the catalog.

use std::sync::Arc;

use crate::{
    models::{
        CatalogEntry, FallbackResult, RecommendationResponse, RecommendationResult, Suggestion,
    },
    services::catalog::CatalogClient,
};

pub const FALLBACK_REASON: &str =
    "No AI suggestions returned usable manga, searching original query instead.";

/// Normalize a title into a catalog search term
///
/// Lowercases, turns every run of characters other than `[a-z0-9]` and
/// whitespace into a single space, collapses whitespace and trims.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone)]
pub struct CatalogResolver {
    catalog: Arc<dyn CatalogClient>,
}

impl CatalogResolver {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Catalog matches for one suggestion; any failure counts as no match
    async fn lookup(catalog: Arc<dyn CatalogClient>, title: String) -> Vec<CatalogEntry> {
        let term = normalize_title(&title);
        match catalog.search(&term).await {
            Ok(results) if results.count > 0 => results
                .manga
                .into_iter()
                .map(CatalogEntry::with_link)
                .collect(),
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    term = %term,
                    provider = catalog.name(),
                    error = %e,
                    "Catalog lookup failed for suggestion"
                );
                Vec::new()
            }
        }
    }

    /// Look up every suggestion concurrently and assemble the response
    ///
    /// Results keep suggestion order. When no suggestion has a match the
    /// original query is searched instead and returned as a fallback.
    pub async fn resolve(
        &self,
        query: &str,
        suggestions: Vec<Suggestion>,
    ) -> RecommendationResponse {
        let mut tasks = Vec::with_capacity(suggestions.len());

        for suggestion in &suggestions {
            let catalog = self.catalog.clone();
            let title = suggestion.title.clone();
            tasks.push(tokio::spawn(Self::lookup(catalog, title)));
        }

        let mut results = Vec::with_capacity(suggestions.len());
        for (suggestion, task) in suggestions.into_iter().zip(tasks) {
            let api = match task.await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!(title = %suggestion.title, error = %e, "Lookup task join error");
                    Vec::new()
                }
            };
            results.push(RecommendationResult {
                title: suggestion.title,
                reason: suggestion.reason,
                api,
            });
        }

        let matched = results.iter().filter(|r| !r.api.is_empty()).count();
        tracing::info!(
            suggestions = results.len(),
            matched,
            "Suggestion lookups completed"
        );

        if matched > 0 {
            return RecommendationResponse::Results { results };
        }

        let fallback_data = match self.catalog.search_raw(&normalize_title(query)).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Fallback search failed");
                None
            }
        };

        RecommendationResponse::Fallback(FallbackResult {
            fallback: true,
            query: query.to_string(),
            reason: FALLBACK_REASON.to_string(),
            fallback_data,
        })
    }
}
