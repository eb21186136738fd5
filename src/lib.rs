pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;

pub use config::Config;
pub use domain::{ApiError, ErrorKind, StateError};
pub use infrastructure::{ApiClient, AppState};
pub use routes::Route;
