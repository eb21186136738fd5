//! Client-side authorization rules.
//!
//! The backend is the real authority; these only decide which controls to
//! show and which requests are worth sending.

use crate::models::review::Review;
use crate::models::user::{Role, User};

/// A review may be edited or deleted by its author or by an admin.
/// Reviews whose author is gone belong to nobody but admins.
pub fn can_modify_review(viewer: Option<&User>, review: &Review) -> bool {
    match viewer {
        Some(user) => user.role == Role::Admin || review.author_id() == Some(user.id.as_str()),
        None => false,
    }
}

pub fn is_admin(viewer: Option<&User>) -> bool {
    viewer.is_some_and(|u| u.role == Role::Admin)
}
