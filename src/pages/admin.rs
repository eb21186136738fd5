//! Admin dashboard: stats, user management, review moderation and the book
//! catalog. Every action checks the role first, the backend checks it again.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{ApiError, StateError};
use crate::infrastructure::AppState;
use crate::models::{AdminStats, Book, BookInput, Review, Role, User};
use crate::services::{admin_service, book_service};
use crate::state::review_flow::DeleteOutcome;
use crate::state::{Confirmer, LoadState};

const DELETE_BOOK_PROMPT: &str = "Are you sure you want to delete this book?";
const DELETE_USER_PROMPT: &str = "Are you sure you want to delete this user?";
const DELETE_REVIEW_PROMPT: &str = "Are you sure you want to delete this review?";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    pub stats: Option<AdminStats>,
    pub users: Vec<User>,
    pub reviews: Vec<Review>,
    pub load: LoadState,
}

#[derive(Clone)]
pub struct AdminDashboard {
    app: AppState,
    state: Arc<watch::Sender<AdminState>>,
}

impl AdminDashboard {
    pub fn new(app: AppState) -> Self {
        let (state, _) = watch::channel(AdminState::default());
        Self {
            app,
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> AdminState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdminState> {
        self.state.subscribe()
    }

    /// Loads stats, users and reviews together. Any failure leaves the
    /// previous data in place and records the error.
    pub async fn load(&self) -> Result<(), ApiError> {
        self.ensure_admin()?;
        self.state.send_modify(|s| {
            s.load.loading = true;
            s.load.error = None;
        });

        let api = &self.app.api;
        let result = futures::try_join!(
            admin_service::get_stats(api),
            admin_service::list_users(api),
            admin_service::list_all_reviews(api)
        );

        match result {
            Ok((stats, users, reviews)) => {
                tracing::info!(
                    "Admin dashboard loaded: {} users, {} reviews",
                    users.len(),
                    reviews.len()
                );
                self.state.send_modify(|s| {
                    s.stats = Some(stats);
                    s.users = users;
                    s.reviews = reviews;
                    s.load.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Reviews whose book title or reviewer name contains `term`, ignoring case.
    pub fn filter_reviews(&self, term: &str) -> Vec<Review> {
        let needle = term.trim().to_lowercase();
        let reviews = self.state.borrow().reviews.clone();
        if needle.is_empty() {
            return reviews;
        }
        reviews
            .into_iter()
            .filter(|r| {
                [r.book_title(), r.author_name()]
                    .into_iter()
                    .flatten()
                    .any(|text| text.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<User, ApiError> {
        self.ensure_admin()?;
        let updated = admin_service::set_user_role(&self.app.api, user_id, role)
            .await
            .inspect_err(|e| self.fail(e))?;
        self.state.send_modify(|s| {
            if let Some(user) = s.users.iter_mut().find(|u| u.id == updated.id) {
                *user = updated.clone();
            }
        });
        Ok(updated)
    }

    pub async fn delete_user(
        &self,
        user_id: &str,
        confirmer: &dyn Confirmer,
    ) -> Result<DeleteOutcome, ApiError> {
        self.ensure_admin()?;
        if self
            .app
            .auth
            .current_user()
            .is_some_and(|me| me.id == user_id)
        {
            return Err(ApiError::forbidden("You cannot delete your own account"));
        }
        if !confirmer.confirm(DELETE_USER_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }
        admin_service::delete_user(&self.app.api, user_id)
            .await
            .inspect_err(|e| self.fail(e))?;
        // Their reviews went with them, so ratings anywhere may have moved
        self.app.catalog.notify_content_changed(None);
        self.load().await?;
        Ok(DeleteOutcome::Deleted)
    }

    pub async fn delete_review(
        &self,
        review: &Review,
        confirmer: &dyn Confirmer,
    ) -> Result<DeleteOutcome, ApiError> {
        self.ensure_admin()?;
        if !confirmer.confirm(DELETE_REVIEW_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }
        let book_id = review.book_id();
        admin_service::delete_any_review(&self.app.api, book_id, &review.id)
            .await
            .inspect_err(|e| self.fail(e))?;
        self.app.catalog.notify_content_changed(Some(book_id));
        self.load().await?;
        Ok(DeleteOutcome::Deleted)
    }

    pub async fn create_book(&self, input: &BookInput) -> Result<Book, ApiError> {
        self.ensure_admin()?;
        let book = book_service::create_book(&self.app.api, input).await?;
        self.app.catalog.notify_content_changed(Some(&book.id));
        Ok(book)
    }

    pub async fn update_book(&self, id: &str, input: &BookInput) -> Result<Book, ApiError> {
        self.ensure_admin()?;
        let book = book_service::update_book(&self.app.api, id, input).await?;
        self.app.catalog.notify_content_changed(Some(&book.id));
        Ok(book)
    }

    pub async fn delete_book(
        &self,
        id: &str,
        confirmer: &dyn Confirmer,
    ) -> Result<DeleteOutcome, ApiError> {
        self.ensure_admin()?;
        if !confirmer.confirm(DELETE_BOOK_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }
        book_service::delete_book(&self.app.api, id).await?;
        self.app.catalog.notify_content_changed(Some(id));
        Ok(DeleteOutcome::Deleted)
    }

    fn ensure_admin(&self) -> Result<(), ApiError> {
        if self.app.auth.snapshot().is_admin() {
            Ok(())
        } else {
            tracing::warn!("Admin action refused for non-admin session");
            Err(ApiError::forbidden("Admin access required"))
        }
    }

    fn fail(&self, error: &ApiError) {
        tracing::warn!("Admin request failed: {}", error);
        let error = StateError::from(error);
        self.state.send_modify(|s| {
            s.load.loading = false;
            s.load.error = Some(error);
        });
    }
}
