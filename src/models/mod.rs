pub mod admin;
pub mod book;
pub mod review;
pub mod user;

pub use admin::AdminStats;
pub use book::{Book, BookInput, BookPage, BookQuery, Pagination};
pub use review::{Review, ReviewInput};
pub use user::{Role, User};
