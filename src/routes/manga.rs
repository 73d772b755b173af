use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::MangaSummary,
    routes::AppState,
    services::library::{ChapterOrder, ChapterPage, LibraryPage, ReaderChapter},
};

#[derive(Debug, Deserialize)]
pub struct ChapterListQuery {
    #[serde(default)]
    order: ChapterOrder,
    #[serde(default = "first_page")]
    page: usize,
}

fn first_page() -> usize {
    1
}

fn invalid_path(e: PathRejection) -> AppError {
    AppError::InvalidInput(e.body_text())
}

fn invalid_query(e: QueryRejection) -> AppError {
    AppError::InvalidInput(e.body_text())
}

/// All genre names
pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.library.genres().await?))
}

/// One page of a genre, newest chapters first
pub async fn library(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, u32)>, PathRejection>,
) -> AppResult<Json<LibraryPage>> {
    let Path((genre, page)) = path.map_err(invalid_path)?;
    Ok(Json(state.library.listing(&genre, page).await?))
}

pub async fn chapters(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<ChapterListQuery>, QueryRejection>,
) -> AppResult<Json<ChapterPage>> {
    let Query(params) = query.map_err(invalid_query)?;
    let page = state.library.chapters(&id, params.order, params.page).await?;
    Ok(Json(page))
}

pub async fn related(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<MangaSummary>>> {
    Ok(Json(state.library.related(&id).await?))
}

pub async fn read(
    State(state): State<Arc<AppState>>,
    Path((id, chapter)): Path<(String, String)>,
) -> AppResult<Json<ReaderChapter>> {
    Ok(Json(state.library.read(&id, &chapter).await?))
}
