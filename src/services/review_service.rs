//! Review endpoints, nested under their book

use crate::domain::ApiError;
use crate::domain::validation::require_id;
use crate::infrastructure::http::ApiClient;
use crate::models::review::BookRef;
use crate::models::{Review, ReviewInput};

use super::book_service::book_path;

fn reviews_path(book_id: &str) -> String {
    format!("{}/reviews", book_path(book_id))
}

fn review_path(book_id: &str, review_id: &str) -> String {
    format!("{}/{}", reviews_path(book_id), urlencoding::encode(review_id))
}

pub async fn list_reviews(api: &ApiClient, book_id: &str) -> Result<Vec<Review>, ApiError> {
    require_id("Book ID", book_id)?;
    let mut reviews: Vec<Review> = api.get(&reviews_path(book_id)).await?;
    for review in reviews.iter_mut().filter(|r| r.book.is_none()) {
        review.book = Some(BookRef::Id(book_id.to_string()));
    }
    tracing::debug!("Book {} has {} reviews", book_id, reviews.len());
    Ok(reviews)
}

pub async fn create_review(
    api: &ApiClient,
    book_id: &str,
    input: &ReviewInput,
) -> Result<Review, ApiError> {
    require_id("Book ID", book_id)?;
    tracing::info!("Create review on book {} (rating {})", book_id, input.rating);
    api.post(&reviews_path(book_id), input).await
}

pub async fn update_review(
    api: &ApiClient,
    book_id: &str,
    review_id: &str,
    input: &ReviewInput,
) -> Result<Review, ApiError> {
    require_id("Book ID", book_id)?;
    require_id("Review ID", review_id)?;
    tracing::info!("Update review {} on book {}", review_id, book_id);
    api.put(&review_path(book_id, review_id), input).await
}

/// Authors delete their own reviews here; admins use the same endpoint
pub async fn delete_review(api: &ApiClient, book_id: &str, review_id: &str) -> Result<(), ApiError> {
    require_id("Book ID", book_id)?;
    require_id("Review ID", review_id)?;
    tracing::info!("Delete review {} on book {}", review_id, book_id);
    api.delete(&review_path(book_id, review_id)).await
}
