pub mod helpers;

pub use helpers::{average_rating, format_date, truncate_text};
