//! Catalog views: sorted genre listings, paged chapter lists, related titles
//! and the chapter reader.

use std::cmp::Ordering;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{ChapterPages, ChapterSummary, MangaSummary},
    services::catalog::CatalogClient,
};

pub const CHAPTERS_PER_PAGE: usize = 10;
pub const MAX_RELATED: usize = 6;

/// First decimal number in a chapter label such as "Chapter 112.5"
static CHAPTER_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("Invalid CHAPTER_NUMBER_REGEX"));

pub fn chapter_number(label: &str) -> Option<f64> {
    CHAPTER_NUMBER_REGEX
        .find(label)
        .and_then(|m| m.as_str().parse().ok())
}

/// Integer part of a chapter path segment: "2.5" is 2, "abc" is `None`
pub fn leading_chapter_integer(chapter: &str) -> Option<u32> {
    let end = chapter
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(chapter.len());
    chapter[..end].parse().ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterOrder {
    #[default]
    Latest,
    Oldest,
}

#[derive(Debug, Serialize)]
pub struct LibraryPage {
    pub manga: Vec<MangaSummary>,
    pub page: u32,
    pub last_page: u32,
}

#[derive(Debug, Serialize)]
pub struct ChapterPage {
    pub chapters: Vec<ChapterSummary>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ReaderChapter {
    #[serde(flatten)]
    pub pages: ChapterPages,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Newest chapter first; entries without a chapter number go last
pub fn sort_by_latest_chapter(manga: &mut [MangaSummary]) {
    let key = |m: &MangaSummary| m.latest_chapter.as_deref().and_then(chapter_number);
    manga.sort_by(|a, b| match (key(a), key(b)) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Sort chapters numerically by id and cut out one page
///
/// `page` is 1-based and clamped to the available range.
pub fn paginate_chapters(
    mut chapters: Vec<ChapterSummary>,
    order: ChapterOrder,
    page: usize,
) -> ChapterPage {
    chapters.sort_by(|a, b| {
        let x = chapter_number(&a.chapter_id).unwrap_or(f64::NEG_INFINITY);
        let y = chapter_number(&b.chapter_id).unwrap_or(f64::NEG_INFINITY);
        let ascending = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        match order {
            ChapterOrder::Latest => ascending.reverse(),
            ChapterOrder::Oldest => ascending,
        }
    });

    let total = chapters.len();
    let total_pages = total.div_ceil(CHAPTERS_PER_PAGE).max(1);
    let page = page.clamp(1, total_pages);
    let chapters = chapters
        .into_iter()
        .skip((page - 1) * CHAPTERS_PER_PAGE)
        .take(CHAPTERS_PER_PAGE)
        .collect();

    ChapterPage {
        chapters,
        page,
        total_pages,
        total,
    }
}

/// Catalog-backed views used by the browsing pages
#[derive(Clone)]
pub struct LibraryService {
    catalog: Arc<dyn CatalogClient>,
}

impl LibraryService {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    pub async fn genres(&self) -> AppResult<Vec<String>> {
        Ok(self.catalog.genres().await?.genre)
    }

    pub async fn listing(&self, genre: &str, page: u32) -> AppResult<LibraryPage> {
        let page = page.max(1);
        let listing = self.catalog.by_genre(&genre.to_lowercase(), page).await?;
        let last_page = listing.pagination.last().copied().unwrap_or(1);

        let mut manga = listing.manga;
        sort_by_latest_chapter(&mut manga);

        Ok(LibraryPage {
            manga,
            page,
            last_page,
        })
    }

    pub async fn chapters(
        &self,
        id: &str,
        order: ChapterOrder,
        page: usize,
    ) -> AppResult<ChapterPage> {
        let details = self.catalog.manga_detail(id).await?;
        Ok(paginate_chapters(details.chapters, order, page))
    }

    /// Titles sharing the manga's first genre, excluding the manga itself
    pub async fn related(&self, id: &str) -> AppResult<Vec<MangaSummary>> {
        let details = self.catalog.manga_detail(id).await?;
        let Some(genre) = details.genres.first() else {
            return Ok(Vec::new());
        };

        let listing = self.catalog.by_genre(&genre.to_lowercase(), 1).await?;
        Ok(listing
            .manga
            .into_iter()
            .filter(|m| m.id != details.id)
            .take(MAX_RELATED)
            .collect())
    }

    /// A chapter's pages plus whether its neighbours exist
    pub async fn read(&self, id: &str, chapter: &str) -> AppResult<ReaderChapter> {
        let number = leading_chapter_integer(chapter)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid chapter number: {}", chapter)))?;

        let pages = self.catalog.chapter(id, chapter).await?;
        if pages.image_urls.is_empty() {
            return Err(AppError::NotFound(format!("Chapter {} of {}", chapter, id)));
        }

        let (has_prev, has_next) = tokio::join!(
            async {
                match number.checked_sub(1) {
                    Some(prev) if prev >= 1 => self.has_pages(id, prev).await,
                    _ => false,
                }
            },
            self.has_pages(id, number.saturating_add(1)),
        );

        Ok(ReaderChapter {
            pages,
            has_prev,
            has_next,
        })
    }

    async fn has_pages(&self, id: &str, chapter: u32) -> bool {
        match self.catalog.chapter(id, &chapter.to_string()).await {
            Ok(pages) => !pages.image_urls.is_empty(),
            Err(e) => {
                tracing::debug!(id = %id, chapter, error = %e, "Neighbour chapter probe failed");
                false
            }
        }
    }
}
