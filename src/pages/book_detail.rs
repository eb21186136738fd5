//! Single book page with its reviews and the review form.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::domain::ApiError;
use crate::infrastructure::AppState;
use crate::models::Review;
use crate::state::review_flow::{DeleteOutcome, FlowError};
use crate::state::{Confirmer, ContentChanged, FetchOutcome, ReviewEditor};
use crate::utils::average_rating;
use crate::views::{DetailView, ReviewFormView, ReviewItem};

#[derive(Clone)]
pub struct BookDetailPage {
    app: AppState,
    book_id: String,
}

impl BookDetailPage {
    pub fn new(app: AppState, book_id: impl Into<String>) -> Self {
        Self {
            app,
            book_id: book_id.into(),
        }
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    /// Loads the book and its reviews side by side.
    pub async fn mount(&self) -> (FetchOutcome, FetchOutcome) {
        futures::join!(
            self.app.catalog.fetch_detail(&self.book_id),
            self.app.reviews.fetch(&self.book_id)
        )
    }

    pub fn view(&self) -> DetailView {
        DetailView::from_state(&self.app.catalog.snapshot(), &self.book_id)
    }

    /// Reviews of this book, with controls only where the viewer may use them.
    pub fn review_items(&self) -> Vec<ReviewItem> {
        let viewer = self.app.auth.current_user();
        let reviews = self.app.reviews.snapshot();
        if reviews.book_id.as_deref() != Some(self.book_id.as_str()) {
            return Vec::new();
        }
        reviews
            .reviews
            .iter()
            .map(|r| ReviewItem::new(r, viewer.as_ref()))
            .collect()
    }

    /// Mean of the reviews currently loaded, for the summary line above them.
    pub fn review_average(&self) -> f64 {
        average_rating(&self.app.reviews.snapshot().reviews)
    }

    pub fn review_form(&self, editor: &ReviewEditor) -> ReviewFormView {
        ReviewFormView::new(&self.app.auth.snapshot(), &editor.snapshot())
    }

    pub fn compose(&self) -> ReviewEditor {
        self.app.review_flow.compose(&self.book_id)
    }

    pub fn edit(&self, review_id: &str) -> Result<ReviewEditor, FlowError> {
        let review = self.find_review(review_id)?;
        self.app.review_flow.edit(&review)
    }

    pub async fn delete_review(
        &self,
        review_id: &str,
        confirmer: &dyn Confirmer,
    ) -> Result<DeleteOutcome, FlowError> {
        let review = self.find_review(review_id)?;
        self.app.review_flow.delete(&review, confirmer).await
    }

    /// Refetches the book when the change concerns it (or no book in particular).
    pub async fn on_content_changed(&self, event: &ContentChanged) -> FetchOutcome {
        match event.book_id.as_deref() {
            Some(id) if id != self.book_id => FetchOutcome::Skipped,
            _ => self.app.catalog.fetch_detail(&self.book_id).await,
        }
    }

    pub fn watch_changes(&self) -> JoinHandle<()> {
        let page = self.clone();
        let mut changes = self.app.catalog.subscribe_changes();
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(event) => {
                        page.on_content_changed(&event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        page.app.catalog.fetch_detail(&page.book_id).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn find_review(&self, review_id: &str) -> Result<Review, FlowError> {
        self.app
            .reviews
            .snapshot()
            .reviews
            .into_iter()
            .find(|r| r.id == review_id)
            .ok_or_else(|| FlowError::Failed(ApiError::not_found("Review not found")))
    }
}
