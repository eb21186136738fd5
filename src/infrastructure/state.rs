//! Application state containing the API client and the state containers

use std::sync::Arc;

use crate::config::Config;
use crate::domain::ApiError;
use crate::infrastructure::http::ApiClient;
use crate::infrastructure::navigator::{History, Navigator};
use crate::infrastructure::token_store::{FileTokenStore, TokenStore};
use crate::routes::Route;
use crate::state::{AuthStore, CatalogStore, ReviewFlow, ReviewStore, Session};

/// Everything a page needs, built once and handed down explicitly
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Shared HTTP client
    pub api: ApiClient,
    /// Authentication container
    pub auth: AuthStore,
    /// Catalog container
    pub catalog: CatalogStore,
    /// Review list of the book being viewed
    pub reviews: ReviewStore,
    /// Review mutations
    pub review_flow: ReviewFlow,
    pub navigator: Arc<dyn Navigator>,
}

impl AppState {
    /// Create an AppState persisting the session to `config.session_file`
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let store = Arc::new(FileTokenStore::new(config.session_file.clone()));
        Self::with_parts(config, store, Arc::new(History::new(Route::Home)))
    }

    /// Create an AppState from explicit collaborators (used by tests)
    pub fn with_parts(
        config: Config,
        token_store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let session = Session::open(token_store);
        let api = ApiClient::new(&config, session.clone(), navigator.clone())?;

        let auth = AuthStore::new(api.clone(), session);
        let catalog = CatalogStore::new(api.clone());
        let reviews = ReviewStore::new(api.clone());
        let review_flow = ReviewFlow::new(api.clone(), auth.clone(), catalog.clone(), reviews.clone());

        Ok(Self {
            config,
            api,
            auth,
            catalog,
            reviews,
            review_flow,
            navigator,
        })
    }
}
