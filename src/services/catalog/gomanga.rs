/// GoManga API client
///
/// Endpoints used:
/// - `/api/search/{term}` → `{ count, manga[] }`
/// - `/api/genre` → `{ genre[] }`
/// - `/api/genre/{genre}/{page}` → `{ manga[], pagination[] }`
/// - `/api/manga/{id}` → detail record with chapter list
/// - `/api/manga/{id}/{chapter}` → `{ title, chapter, imageUrls[] }`
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{ChapterPages, GenreList, GenreListing, MangaDetails, SearchResults},
    services::catalog::CatalogClient,
};

#[derive(Clone)]
pub struct GoMangaClient {
    http_client: HttpClient,
    api_url: String,
}

impl GoMangaClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), api_url)
    }

    pub fn with_client(http_client: HttpClient, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            api_url,
        }
    }

    fn search_url(&self, term: &str) -> String {
        format!("{}/api/search/{}", self.api_url, urlencoding::encode(term))
    }

    /// GET a catalog URL and decode it, treating non-2xx as an upstream error
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Catalog API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(error = %e, url = %url, "Failed to deserialize catalog response");
            AppError::ExternalApi(format!("Failed to parse catalog response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogClient for GoMangaClient {
    async fn search(&self, term: &str) -> AppResult<SearchResults> {
        let results: SearchResults = self.get_json(&self.search_url(term)).await?;

        tracing::debug!(
            term = %term,
            count = results.count,
            provider = "gomanga",
            "Catalog search completed"
        );

        Ok(results)
    }

    async fn search_raw(&self, term: &str) -> AppResult<Value> {
        self.get_json(&self.search_url(term)).await
    }

    async fn by_genre(&self, genre: &str, page: u32) -> AppResult<GenreListing> {
        let url = format!(
            "{}/api/genre/{}/{}",
            self.api_url,
            urlencoding::encode(genre),
            page
        );
        self.get_json(&url).await
    }

    async fn genres(&self) -> AppResult<GenreList> {
        let url = format!("{}/api/genre", self.api_url);
        self.get_json(&url).await
    }

    async fn manga_detail(&self, id: &str) -> AppResult<MangaDetails> {
        let url = format!("{}/api/manga/{}", self.api_url, urlencoding::encode(id));
        self.get_json(&url).await
    }

    async fn chapter(&self, id: &str, chapter: &str) -> AppResult<ChapterPages> {
        let url = format!(
            "{}/api/manga/{}/{}",
            self.api_url,
            urlencoding::encode(id),
            urlencoding::encode(chapter)
        );
        self.get_json(&url).await
    }

    async fn fetch_raw(&self, path: &str) -> AppResult<Value> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ProxyFetch(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                path = %path,
                "Catalog returned non-success status, passing body through"
            );
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::ProxyFetch(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "gomanga"
    }
}
