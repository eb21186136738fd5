//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - HTTP client wrapper (http)
//! - Session token persistence (token_store)
//! - Navigation (navigator)
//! - Application state (state)

pub mod http;
pub mod navigator;
pub mod state;
pub mod token_store;

pub use http::ApiClient;
pub use navigator::{History, Navigator};
pub use state::AppState;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
