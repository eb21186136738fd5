//! Admin dashboard endpoints

use crate::domain::ApiError;
use crate::domain::validation::require_id;
use crate::infrastructure::http::ApiClient;
use crate::models::admin::RoleChange;
use crate::models::{AdminStats, Review, Role, User};

use super::review_service;

pub async fn get_stats(api: &ApiClient) -> Result<AdminStats, ApiError> {
    api.get("/admin/stats").await
}

pub async fn list_users(api: &ApiClient) -> Result<Vec<User>, ApiError> {
    api.get("/admin/users").await
}

pub async fn set_user_role(api: &ApiClient, user_id: &str, role: Role) -> Result<User, ApiError> {
    require_id("User ID", user_id)?;
    tracing::info!("Set role of user {} to {}", user_id, role.as_str());
    api.patch(
        &format!("/admin/users/{}/role", urlencoding::encode(user_id)),
        &RoleChange { role },
    )
    .await
}

pub async fn delete_user(api: &ApiClient, user_id: &str) -> Result<(), ApiError> {
    require_id("User ID", user_id)?;
    tracing::info!("Delete user {}", user_id);
    api.delete(&format!("/admin/users/{}", urlencoding::encode(user_id)))
        .await
}

pub async fn list_all_reviews(api: &ApiClient) -> Result<Vec<Review>, ApiError> {
    api.get("/admin/reviews").await
}

/// Deletes any review through the regular review endpoint; the backend lets
/// admins through. Both ids are required.
pub async fn delete_any_review(
    api: &ApiClient,
    book_id: &str,
    review_id: &str,
) -> Result<(), ApiError> {
    review_service::delete_review(api, book_id, review_id).await
}
