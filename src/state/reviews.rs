//! Review list for one book at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::catalog::{FetchOutcome, LoadState};
use crate::infrastructure::http::ApiClient;
use crate::models::Review;
use crate::services::review_service;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewListState {
    pub book_id: Option<String>,
    pub reviews: Vec<Review>,
    pub load: LoadState,
}

#[derive(Clone)]
pub struct ReviewStore {
    inner: Arc<Inner>,
}

struct Inner {
    api: ApiClient,
    state: watch::Sender<ReviewListState>,
    seq: AtomicU64,
}

impl ReviewStore {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(ReviewListState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                state,
                seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn snapshot(&self) -> ReviewListState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReviewListState> {
        self.inner.state.subscribe()
    }

    pub async fn fetch(&self, book_id: &str) -> FetchOutcome {
        if book_id.trim().is_empty() {
            return FetchOutcome::Skipped;
        }
        let ticket = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.state.send_modify(|s| {
            if s.book_id.as_deref() != Some(book_id) {
                s.reviews.clear();
                s.book_id = Some(book_id.to_string());
            }
            s.load.loading = true;
            s.load.error = None;
        });

        let result = review_service::list_reviews(&self.inner.api, book_id).await;

        let applied = self.inner.state.send_if_modified(|s| {
            if self.inner.seq.load(Ordering::SeqCst) != ticket {
                return false;
            }
            s.load.loading = false;
            match result {
                Ok(reviews) => s.reviews = reviews,
                Err(e) => {
                    tracing::warn!("Failed to load reviews for book {}: {}", book_id, e);
                    s.reviews.clear();
                    s.load.error = Some(e.into());
                }
            }
            true
        });

        if applied {
            FetchOutcome::Applied
        } else {
            FetchOutcome::Superseded
        }
    }

    /// Refetches the reviews of whatever book is loaded.
    pub async fn refresh(&self) -> FetchOutcome {
        let current = self.inner.state.borrow().book_id.clone();
        match current {
            Some(book_id) => self.fetch(&book_id).await,
            None => FetchOutcome::Skipped,
        }
    }
}
