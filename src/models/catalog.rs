use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Accepts string or numeric ids; anything else (or a missing id) is empty
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        _ => String::new(),
    })
}

// ============================================================================
// Catalog API Types
// ============================================================================

/// A manga record returned by a catalog search.
///
/// Fields the catalog sends beyond `id` and `title` are carried through
/// untouched in `extra`. `link` is filled in by the resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    /// Returns the entry with its in-app navigation path attached
    ///
    /// Entries without an id are passed through with no link.
    pub fn with_link(mut self) -> Self {
        if !self.id.is_empty() {
            self.link = Some(format!("/manga/{}", self.id));
        }
        self
    }
}

/// Response from GET /api/search/{term}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub manga: Vec<CatalogEntry>,
}

/// Summary card used in genre listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MangaSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latest_chapter: Option<String>,
}

/// Response from GET /api/genre/{genre}/{page}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreListing {
    #[serde(default)]
    pub manga: Vec<MangaSummary>,
    #[serde(default)]
    pub pagination: Vec<u32>,
}

/// Response from GET /api/genre
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genre: Vec<String>,
}

/// One row of a manga's chapter list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub chapter_id: String,
    #[serde(default)]
    pub views: String,
    #[serde(default)]
    pub uploaded: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Response from GET /api/manga/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaDetails {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub views: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub chapters: Vec<ChapterSummary>,
}

/// Response from GET /api/manga/{id}/{chapter}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPages {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chapter: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_entry_keeps_unknown_fields() {
        let raw = json!({
            "id": "chainsaw-man",
            "title": "Chainsaw Man",
            "imgUrl": "https://img.example/csm.jpg",
            "latestChapters": [{ "chapter": "180" }]
        });

        let entry: CatalogEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.id, "chainsaw-man");
        assert_eq!(entry.link, None);

        let out = serde_json::to_value(entry.with_link()).unwrap();
        assert_eq!(out["link"], "/manga/chainsaw-man");
        assert_eq!(out["imgUrl"], "https://img.example/csm.jpg");
        assert_eq!(out["latestChapters"][0]["chapter"], "180");
    }

    #[test]
    fn test_search_results_tolerate_odd_ids() {
        let raw = json!({
            "count": 3,
            "manga": [
                { "id": "berserk", "title": "Berserk" },
                { "id": 4021, "title": "Numeric" },
                { "title": "No Id", "imgUrl": "x.jpg" }
            ]
        });

        let results: SearchResults = serde_json::from_value(raw).unwrap();
        assert_eq!(results.manga.len(), 3);
        assert_eq!(results.manga[1].id, "4021");
        assert_eq!(
            results.manga[1].clone().with_link().link.as_deref(),
            Some("/manga/4021")
        );

        let no_id = results.manga[2].clone().with_link();
        assert_eq!(no_id.id, "");
        assert_eq!(no_id.link, None);
        assert_eq!(no_id.extra["imgUrl"], "x.jpg");
    }

    #[test]
    fn test_search_results_missing_fields_default() {
        let results: SearchResults = serde_json::from_str("{}").unwrap();
        assert_eq!(results.count, 0);
        assert!(results.manga.is_empty());
    }

    #[test]
    fn test_manga_details_deserialization() {
        let json = r#"{
            "id": "vinland-saga",
            "title": "Vinland Saga",
            "imageUrl": "https://img.example/vs.jpg",
            "author": "Makoto Yukimura",
            "status": "Ongoing",
            "lastUpdated": "Jan 01,2025",
            "views": "10M",
            "genres": ["Action", "Historical"],
            "rating": "4.9",
            "chapters": [
                { "chapterId": "1", "views": "1M", "uploaded": "2005", "timestamp": "x" }
            ]
        }"#;

        let details: MangaDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.image_url, "https://img.example/vs.jpg");
        assert_eq!(details.last_updated, "Jan 01,2025");
        assert_eq!(details.genres, vec!["Action", "Historical"]);
        assert_eq!(details.chapters[0].chapter_id, "1");
    }

    #[test]
    fn test_chapter_pages_deserialization() {
        let json = r#"{ "title": "Vinland Saga", "chapter": "2", "imageUrls": ["a.jpg", "b.jpg"] }"#;
        let pages: ChapterPages = serde_json::from_str(json).unwrap();
        assert_eq!(pages.image_urls.len(), 2);
    }
}
