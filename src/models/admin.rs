use serde::{Deserialize, Serialize};

use super::user::Role;

/// Dashboard counters from `GET /admin/stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_books: u64,
    pub total_users: u64,
    pub total_reviews: u64,
    pub average_rating: f64,
}

/// Body for `PATCH /admin/users/:id/role`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoleChange {
    pub role: Role,
}
