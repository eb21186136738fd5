//! Presence and range checks run before anything touches the network.

use super::ValidationError;
use crate::models::review::ReviewInput;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Rejects empty or whitespace-only values.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn validate_rating(rating: i64) -> Result<u8, ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }
    Ok(rating as u8)
}

/// Builds the payload for a review create/edit, trimming the comment.
pub fn review_input(rating: i64, comment: &str) -> Result<ReviewInput, ValidationError> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    let rating = validate_rating(rating)?;
    Ok(ReviewInput {
        rating,
        comment: comment.to_string(),
    })
}

pub fn require_id(field: &'static str, id: &str) -> Result<(), ValidationError> {
    require(field, id)
}
