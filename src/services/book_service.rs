//! Book endpoints
//!
//! One function per backend operation. Mutations here are admin-only on the
//! backend; the caller decides whether to show the controls at all.

use crate::domain::ApiError;
use crate::domain::validation::{require, require_id};
use crate::infrastructure::http::ApiClient;
use crate::models::{Book, BookInput, BookPage, BookQuery};

pub(crate) fn book_path(id: &str) -> String {
    format!("/books/{}", urlencoding::encode(id))
}

/// List books matching the search term, one page at a time
pub async fn list_books(api: &ApiClient, query: &BookQuery) -> Result<BookPage, ApiError> {
    tracing::info!(
        "List books - search={:?}, page={}, limit={}",
        query.search,
        query.page,
        query.limit
    );

    let page: BookPage = api.get_with_query("/books", &query.to_params()).await?;

    tracing::info!("Backend returned {} of {} books", page.books.len(), page.total);
    Ok(page)
}

/// Get a single book by ID
pub async fn get_book(api: &ApiClient, id: &str) -> Result<Book, ApiError> {
    require_id("Book ID", id)?;
    api.get(&book_path(id)).await
}

/// Create a new book
pub async fn create_book(api: &ApiClient, input: &BookInput) -> Result<Book, ApiError> {
    validate_book(input)?;
    tracing::info!("Create book: {}", input.title);
    api.post("/books", input).await
}

/// Update an existing book
pub async fn update_book(api: &ApiClient, id: &str, input: &BookInput) -> Result<Book, ApiError> {
    require_id("Book ID", id)?;
    validate_book(input)?;
    tracing::info!("Update book {}: {}", id, input.title);
    api.patch(&book_path(id), input).await
}

/// Delete a book by ID
pub async fn delete_book(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    require_id("Book ID", id)?;
    tracing::info!("Delete book {}", id);
    api.delete(&book_path(id)).await
}

fn validate_book(input: &BookInput) -> Result<(), ApiError> {
    require("Title", &input.title)?;
    require("Author", &input.author)?;
    Ok(())
}
