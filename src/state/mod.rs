//! Client-side state containers.
//!
//! Each container is an explicit, cloneable handle built once in
//! [`AppState`](crate::infrastructure::AppState) and passed to whoever needs it.
//! State is published through `tokio::sync::watch` so views can re-render on
//! change; cross-container refresh goes through the catalog's broadcast channel.

pub mod auth;
pub mod catalog;
pub mod review_flow;
pub mod reviews;

pub use auth::{AuthState, AuthStore, Session};
pub use catalog::{CatalogState, CatalogStore, ContentChanged, FetchOutcome, LoadState};
pub use review_flow::{ReviewEditor, ReviewFlow};
pub use reviews::{ReviewListState, ReviewStore};

/// Asks the person before a destructive action goes out.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmer for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
