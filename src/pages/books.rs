//! Book listing page: search box, paged results, URL kept in sync.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::infrastructure::AppState;
use crate::routes::{ListingQuery, Route};
use crate::state::{ContentChanged, FetchOutcome};
use crate::views::BookListView;

#[derive(Clone)]
pub struct BooksPage {
    app: AppState,
    listing: Arc<watch::Sender<ListingQuery>>,
}

impl BooksPage {
    /// `listing` comes from the URL the page was opened with.
    pub fn new(app: AppState, listing: ListingQuery) -> Self {
        let (listing, _) = watch::channel(listing);
        Self {
            app,
            listing: Arc::new(listing),
        }
    }

    pub fn listing(&self) -> ListingQuery {
        self.listing.borrow().clone()
    }

    pub async fn mount(&self) -> FetchOutcome {
        self.load().await
    }

    /// A new search always starts again from the first page.
    pub async fn search(&self, term: &str) -> FetchOutcome {
        self.go_to(ListingQuery::new(term, 1)).await
    }

    pub async fn go_to_page(&self, page: u32) -> FetchOutcome {
        let search = self.listing.borrow().search.clone();
        self.go_to(ListingQuery::new(search, page)).await
    }

    pub fn view(&self) -> BookListView {
        BookListView::from_state(&self.app.catalog.snapshot())
    }

    /// Every card shows an aggregate rating, so any change is worth a refetch.
    pub async fn on_content_changed(&self, event: &ContentChanged) -> FetchOutcome {
        tracing::debug!("Book list refresh after change to {:?}", event.book_id);
        self.load().await
    }

    /// Refetches the list on every content change until the page is dropped
    /// and the returned task aborted.
    pub fn watch_changes(&self) -> JoinHandle<()> {
        let page = self.clone();
        let mut changes = self.app.catalog.subscribe_changes();
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(event) => {
                        page.on_content_changed(&event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!("Missed {} content changes, refreshing once", skipped);
                        page.load().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    async fn go_to(&self, listing: ListingQuery) -> FetchOutcome {
        self.listing.send_replace(listing.clone());
        self.app.navigator.navigate(Route::Books(listing));
        self.load().await
    }

    async fn load(&self) -> FetchOutcome {
        let listing = self.listing();
        self.app
            .catalog
            .fetch_list(&listing.search, listing.page, self.app.config.page_size)
            .await
    }
}
