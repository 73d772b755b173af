/// Manga catalog client abstraction
///
/// The catalog is the third-party service that owns search, genre listings,
/// manga details and chapter images. Everything here is a plain GET plus JSON
/// decode with no retry; callers decide whether a failure means "no data".
use serde_json::Value;

use crate::{
    error::AppResult,
    models::{ChapterPages, GenreList, GenreListing, MangaDetails, SearchResults},
};

pub mod gomanga;

pub use gomanga::GoMangaClient;

/// Trait for manga catalog backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search titles by free-text term
    async fn search(&self, term: &str) -> AppResult<SearchResults>;

    /// Same search, returning the catalog's JSON untouched
    async fn search_raw(&self, term: &str) -> AppResult<Value>;

    /// One page of a genre listing (`latest` is also accepted as a genre)
    async fn by_genre(&self, genre: &str, page: u32) -> AppResult<GenreListing>;

    /// All known genre names
    async fn genres(&self) -> AppResult<GenreList>;

    /// Full detail record including the chapter list
    async fn manga_detail(&self, id: &str) -> AppResult<MangaDetails>;

    /// Page images for one chapter
    async fn chapter(&self, id: &str, chapter: &str) -> AppResult<ChapterPages>;

    /// Fetch an arbitrary catalog path and pass its JSON through
    ///
    /// The upstream status code is not checked; only transport and decode
    /// failures are errors.
    async fn fetch_raw(&self, path: &str) -> AppResult<Value>;

    /// Client name for logging
    fn name(&self) -> &'static str;
}
