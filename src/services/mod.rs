//! Services Layer
//!
//! One async function per backend endpoint. Each takes typed parameters, lets
//! [`ApiClient`](crate::infrastructure::http::ApiClient) attach the session
//! token, and returns the parsed body or a normalized
//! [`ApiError`](crate::domain::ApiError).

pub mod admin_service;
pub mod auth_service;
pub mod book_service;
pub mod review_service;
