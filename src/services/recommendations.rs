use crate::{
    error::AppResult,
    models::RecommendationResponse,
    services::{
        generator::RecommendationGenerator, parser::SuggestionParser, resolver::CatalogResolver,
    },
};

/// AI-assisted manga recommendations
///
/// Query → model text → parsed suggestions → catalog lookups. Only the
/// generation step can fail the request; catalog problems degrade to empty
/// matches or the fallback search.
#[derive(Clone)]
pub struct RecommendationService {
    generator: RecommendationGenerator,
    parser: SuggestionParser,
    resolver: CatalogResolver,
}

impl RecommendationService {
    pub fn new(
        generator: RecommendationGenerator,
        parser: SuggestionParser,
        resolver: CatalogResolver,
    ) -> Self {
        Self {
            generator,
            parser,
            resolver,
        }
    }

    pub async fn recommend(&self, query: &str) -> AppResult<RecommendationResponse> {
        let text = self.generator.generate(query).await?;
        tracing::debug!(raw = %text, "Model raw output");

        let suggestions = self.parser.parse(&text);
        tracing::info!(suggestions = suggestions.len(), "Parsed model suggestions");

        Ok(self.resolver.resolve(query, suggestions).await)
    }
}
