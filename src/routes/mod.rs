use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        catalog::{CatalogClient, GoMangaClient},
        gemini::GeminiClient,
        generator::{LanguageModel, RecommendationGenerator, RetryPolicy},
        library::LibraryService,
        parser::SuggestionParser,
        recommendations::RecommendationService,
        resolver::CatalogResolver,
    },
};

pub mod manga;
pub mod proxy;
pub mod recommendations;

/// Shared, read-only handles used by the handlers
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub recommendations: RecommendationService,
    pub library: LibraryService,
}

impl AppState {
    /// Wires services around the given catalog and language model
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        model: Arc<dyn LanguageModel>,
        models: Vec<String>,
        retry: RetryPolicy,
    ) -> Self {
        let recommendations = RecommendationService::new(
            RecommendationGenerator::new(model, models, retry),
            SuggestionParser::default(),
            CatalogResolver::new(catalog.clone()),
        );

        Self {
            library: LibraryService::new(catalog.clone()),
            catalog,
            recommendations,
        }
    }

    /// Production wiring: GoManga catalog plus Gemini
    pub fn from_config(config: &Config) -> Self {
        let catalog = Arc::new(GoMangaClient::new(config.catalog_base()));
        let model = Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
        ));
        let retry = RetryPolicy {
            max_attempts: config.generation_max_attempts,
            backoff_step: config.generation_backoff(),
        };

        Self::new(catalog, model, config.generation_models.clone(), retry)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ai-recommend", post(recommendations::recommend))
        .route("/proxy", get(proxy::proxy))
        .route("/genres", get(manga::genres))
        .route("/library/:genre/:page", get(manga::library))
        .route("/manga/:id/chapters", get(manga::chapters))
        .route("/manga/:id/related", get(manga::related))
        .route("/manga/:id/:chapter/read", get(manga::read))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
