//! Creating, editing and deleting reviews.
//!
//! An editor moves `Idle -> Submitting -> Succeeded`; a failed submit settles
//! back to `Idle` with the error message and the draft untouched. Invalid
//! drafts never leave `Idle` and never reach the network. Every successful
//! mutation refetches the review list and publishes a content change so the
//! owning book's aggregate rating gets refreshed wherever it is shown.

use thiserror::Error;
use tokio::sync::watch;

use super::Confirmer;
use super::auth::AuthStore;
use super::catalog::CatalogStore;
use super::reviews::ReviewStore;
use crate::domain::policy::can_modify_review;
use crate::domain::validation;
use crate::domain::{ApiError, ValidationError};
use crate::infrastructure::http::ApiClient;
use crate::models::Review;
use crate::services::review_service;

pub const DEFAULT_RATING: i64 = 5;
const DELETE_PROMPT: &str = "Are you sure you want to delete this review?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create { book_id: String },
    Edit { book_id: String, review_id: String },
}

impl EditorMode {
    pub fn book_id(&self) -> &str {
        match self {
            EditorMode::Create { book_id } | EditorMode::Edit { book_id, .. } => book_id,
        }
    }
}

/// What the person has typed. The rating is kept as entered and only
/// range-checked on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: i64,
    pub comment: String,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            comment: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub mode: EditorMode,
    pub draft: ReviewDraft,
    pub phase: Phase,
    pub error: Option<String>,
}

impl EditorState {
    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.phase != Phase::Submitting && !self.draft.comment.trim().is_empty()
    }
}

#[derive(Error, Debug, Clone)]
pub enum FlowError {
    #[error("A submission is already in progress")]
    Busy,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("You can only change your own reviews")]
    NotAllowed,
    #[error(transparent)]
    Failed(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Entry point for review mutations, wired with the containers it refreshes.
#[derive(Clone)]
pub struct ReviewFlow {
    api: ApiClient,
    auth: AuthStore,
    catalog: CatalogStore,
    reviews: ReviewStore,
}

impl ReviewFlow {
    pub fn new(api: ApiClient, auth: AuthStore, catalog: CatalogStore, reviews: ReviewStore) -> Self {
        Self {
            api,
            auth,
            catalog,
            reviews,
        }
    }

    /// Whether the signed-in user may edit or delete `review`.
    pub fn can_modify(&self, review: &Review) -> bool {
        can_modify_review(self.auth.current_user().as_ref(), review)
    }

    pub fn compose(&self, book_id: &str) -> ReviewEditor {
        ReviewEditor::new(
            self.clone(),
            EditorMode::Create {
                book_id: book_id.to_string(),
            },
            ReviewDraft::default(),
        )
    }

    /// Editor prefilled with `review`, for its author or an admin.
    pub fn edit(&self, review: &Review) -> Result<ReviewEditor, FlowError> {
        if !self.can_modify(review) {
            return Err(FlowError::NotAllowed);
        }
        Ok(ReviewEditor::new(
            self.clone(),
            EditorMode::Edit {
                book_id: review.book_id().to_string(),
                review_id: review.id.clone(),
            },
            ReviewDraft {
                rating: i64::from(review.rating),
                comment: review.comment.clone(),
            },
        ))
    }

    /// Deletes `review` after the confirmer agrees.
    pub async fn delete(
        &self,
        review: &Review,
        confirmer: &dyn Confirmer,
    ) -> Result<DeleteOutcome, FlowError> {
        if !self.can_modify(review) {
            return Err(FlowError::NotAllowed);
        }
        if !confirmer.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }
        review_service::delete_review(&self.api, review.book_id(), &review.id).await?;
        self.settle(review.book_id()).await;
        Ok(DeleteOutcome::Deleted)
    }

    async fn settle(&self, book_id: &str) {
        if self.reviews.snapshot().book_id.as_deref() == Some(book_id) {
            self.reviews.fetch(book_id).await;
        }
        self.catalog.notify_content_changed(Some(book_id));
    }
}

pub struct ReviewEditor {
    flow: ReviewFlow,
    state: watch::Sender<EditorState>,
}

impl ReviewEditor {
    fn new(flow: ReviewFlow, mode: EditorMode, draft: ReviewDraft) -> Self {
        let (state, _) = watch::channel(EditorState {
            mode,
            draft,
            phase: Phase::Idle,
            error: None,
        });
        Self { flow, state }
    }

    pub fn snapshot(&self) -> EditorState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EditorState> {
        self.state.subscribe()
    }

    pub fn set_rating(&self, rating: i64) {
        self.state.send_modify(|s| {
            s.draft.rating = rating;
            if s.phase == Phase::Succeeded {
                s.phase = Phase::Idle;
            }
        });
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        let comment = comment.into();
        self.state.send_modify(|s| {
            s.draft.comment = comment;
            if s.phase == Phase::Succeeded {
                s.phase = Phase::Idle;
            }
        });
    }

    pub async fn submit(&self) -> Result<Review, FlowError> {
        let mut begun = Err(FlowError::Busy);
        self.state.send_if_modified(|s| {
            if s.phase == Phase::Submitting {
                return false;
            }
            match validation::review_input(s.draft.rating, &s.draft.comment) {
                Ok(input) => {
                    s.phase = Phase::Submitting;
                    s.error = None;
                    begun = Ok((s.mode.clone(), input));
                }
                Err(invalid) => {
                    s.phase = Phase::Idle;
                    s.error = Some(invalid.to_string());
                    begun = Err(FlowError::Invalid(invalid));
                }
            }
            true
        });
        let (mode, input) = begun?;

        let api = &self.flow.api;
        let result = match &mode {
            EditorMode::Create { book_id } => {
                review_service::create_review(api, book_id, &input).await
            }
            EditorMode::Edit { book_id, review_id } => {
                review_service::update_review(api, book_id, review_id, &input).await
            }
        };

        match result {
            Ok(review) => {
                // An edit form keeps showing the saved review; a create form starts over
                let draft = match mode {
                    EditorMode::Create { .. } => ReviewDraft::default(),
                    EditorMode::Edit { .. } => ReviewDraft {
                        rating: i64::from(review.rating),
                        comment: review.comment.clone(),
                    },
                };
                self.state.send_modify(|s| {
                    s.phase = Phase::Succeeded;
                    s.error = None;
                    s.draft = draft;
                });
                self.flow.settle(mode.book_id()).await;
                Ok(review)
            }
            Err(e) => {
                self.state.send_modify(|s| {
                    s.phase = Phase::Idle;
                    s.error = Some(e.user_message());
                });
                Err(FlowError::Failed(e))
            }
        }
    }
}
