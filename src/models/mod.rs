pub mod catalog;
pub mod recommendation;

pub use catalog::{
    CatalogEntry, ChapterPages, ChapterSummary, GenreList, GenreListing, MangaDetails,
    MangaSummary, SearchResults,
};
pub use recommendation::{
    FallbackResult, RecommendationRequest, RecommendationResponse, RecommendationResult,
    Suggestion,
};
