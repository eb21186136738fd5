//! Catalog state container: the current book list, its pagination, and the
//! single selected book.
//!
//! List and detail fetches each carry a ticket from their own sequence. A
//! response is applied only if its ticket is still the newest one issued, so
//! whatever order responses arrive in, the state ends up reflecting the last
//! fetch that was started.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, watch};

use crate::domain::StateError;
use crate::infrastructure::http::ApiClient;
use crate::models::{Book, BookQuery, Pagination};
use crate::services::book_service;

const CHANGE_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadState {
    pub loading: bool,
    pub error: Option<StateError>,
}

impl LoadState {
    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self, error: Option<StateError>) {
        self.loading = false;
        self.error = error;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub books: Vec<Book>,
    pub pagination: Pagination,
    /// Query the current `books` answer.
    pub query: Option<BookQuery>,
    pub list: LoadState,
    pub book: Option<Book>,
    pub detail: LoadState,
}

/// Published after something changed a book's reviews or the book itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChanged {
    /// `None` when the change is not tied to one book (e.g. a deleted user).
    pub book_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was started before this one settled.
    Superseded,
    Skipped,
}

#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<Inner>,
}

struct Inner {
    api: ApiClient,
    state: watch::Sender<CatalogState>,
    list_seq: AtomicU64,
    detail_seq: AtomicU64,
    changes: broadcast::Sender<ContentChanged>,
}

impl CatalogStore {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                api,
                state,
                list_seq: AtomicU64::new(0),
                detail_seq: AtomicU64::new(0),
                changes,
            }),
        }
    }

    pub fn snapshot(&self) -> CatalogState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.inner.state.subscribe()
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<ContentChanged> {
        self.inner.changes.subscribe()
    }

    pub async fn fetch_list(&self, search: &str, page: u32, page_size: u32) -> FetchOutcome {
        let query = BookQuery::new(search, page, page_size);
        let ticket = self.inner.list_seq.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.state.send_modify(|s| s.list.start());

        let result = book_service::list_books(&self.inner.api, &query).await;

        let applied = self.inner.state.send_if_modified(|s| {
            if self.inner.list_seq.load(Ordering::SeqCst) != ticket {
                return false;
            }
            match result {
                Ok(page) => {
                    s.pagination = page.pagination();
                    s.books = page.books;
                    s.list.finish(None);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch books: {}", e);
                    s.books.clear();
                    s.pagination = Pagination::default();
                    s.list.finish(Some(e.into()));
                }
            }
            s.query = Some(query.clone());
            true
        });

        if applied {
            FetchOutcome::Applied
        } else {
            tracing::debug!("Discarding stale list response for {:?}", query);
            FetchOutcome::Superseded
        }
    }

    pub async fn fetch_detail(&self, id: &str) -> FetchOutcome {
        if id.trim().is_empty() {
            return FetchOutcome::Skipped;
        }
        let ticket = self.inner.detail_seq.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.state.send_modify(|s| {
            // Keep showing the same book while refreshing it, never another one
            if s.book.as_ref().is_some_and(|b| b.id != id) {
                s.book = None;
            }
            s.detail.start();
        });

        let result = book_service::get_book(&self.inner.api, id).await;

        let applied = self.inner.state.send_if_modified(|s| {
            if self.inner.detail_seq.load(Ordering::SeqCst) != ticket {
                return false;
            }
            match result {
                Ok(book) => {
                    s.book = Some(book);
                    s.detail.finish(None);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch book {}: {}", id, e);
                    s.book = None;
                    s.detail.finish(Some(e.into()));
                }
            }
            true
        });

        if applied {
            FetchOutcome::Applied
        } else {
            tracing::debug!("Discarding stale detail response for book {}", id);
            FetchOutcome::Superseded
        }
    }

    /// Tells list and detail views that data they show may be out of date.
    /// Nothing in this container changes; subscribers decide whether to refetch.
    pub fn notify_content_changed(&self, book_id: Option<&str>) {
        let event = ContentChanged {
            book_id: book_id.map(str::to_string),
        };
        match self.inner.changes.send(event) {
            Ok(receivers) => tracing::debug!("Content change sent to {} subscribers", receivers),
            Err(_) => tracing::debug!("Content change with no subscribers"),
        }
    }
}
