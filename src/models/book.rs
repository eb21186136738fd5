use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry as the backend returns it.
///
/// `avg_rating` and `num_reviews` are owned by the backend and recomputed there
/// on every review mutation; the client only ever replaces them by refetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, alias = "coverURL", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for admin create/update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub featured: bool,
}

impl From<&Book> for BookInput {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            summary: book.summary.clone(),
            genre: book.genre.clone(),
            cover_image: book.cover_image.clone(),
            featured: book.featured,
        }
    }
}

/// Query for `GET /books`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    pub search: String,
    pub page: u32,
    pub limit: u32,
}

impl BookQuery {
    pub fn new(search: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            search: search.into(),
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Query-string pairs. An empty search term is left out so the backend
    /// returns the unfiltered list.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.limit.to_string()));
        params
    }
}

/// Pagination metadata, recomputed on every list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            pages: 1,
            total: 0,
        }
    }
}

/// `{ books, page, pages, total }` list response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookPage {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
}

impl BookPage {
    /// Missing or zero page counters read as page 1 of 1.
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page.max(1),
            pages: self.pages.max(1),
            total: self.total,
        }
    }
}
