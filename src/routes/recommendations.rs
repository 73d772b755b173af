use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

/// Handler for the AI recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let query = match request.query {
        Some(query) if !query.is_empty() => query,
        _ => return Err(AppError::InvalidInput("missing query".to_string())),
    };

    tracing::info!(request_id = %request_id, query = %query, "Processing recommendation request");

    let response = state.recommendations.recommend(&query).await?;

    tracing::info!(
        request_id = %request_id,
        fallback = response.is_fallback(),
        "Recommendation completed"
    );

    Ok(Json(response))
}
