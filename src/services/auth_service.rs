//! Auth endpoints under `/auth`. The older `/users/...` routes are not used.

use crate::domain::ApiError;
use crate::infrastructure::http::ApiClient;
use crate::models::User;
use crate::models::user::{AuthResponse, Credentials, ProfileUpdate, Registration};

pub async fn login(api: &ApiClient, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
    tracing::info!("Login attempt for user: {}", credentials.email);
    api.post("/auth/login", credentials).await
}

pub async fn register(api: &ApiClient, registration: &Registration) -> Result<AuthResponse, ApiError> {
    tracing::info!("Registering user: {}", registration.email);
    api.post("/auth/register", registration).await
}

pub async fn get_profile(api: &ApiClient) -> Result<User, ApiError> {
    api.get("/auth/profile").await
}

pub async fn update_profile(api: &ApiClient, fields: &ProfileUpdate) -> Result<User, ApiError> {
    api.put("/auth/profile", fields).await
}
