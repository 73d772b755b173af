use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    url: Option<String>,
}

/// Handler for the catalog passthrough endpoint
///
/// `url` is a path on the catalog host, e.g. `/api/manga/berserk`.
pub async fn proxy(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ProxyQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(params) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let path = match params.url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(AppError::InvalidInput("Missing URL param".to_string())),
    };

    // Anything other than a rooted path could redirect the request off-host.
    if !path.starts_with('/') {
        return Err(AppError::InvalidInput("Invalid URL param".to_string()));
    }

    let data = state.catalog.fetch_raw(&path).await?;
    Ok(Json(data))
}
