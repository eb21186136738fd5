//! Page controllers, one per route.
//!
//! A page owns no data of its own beyond form input; it reads the shared
//! containers in [`AppState`] and turns them into views.

pub mod account;
pub mod admin;
pub mod book_detail;
pub mod books;

pub use account::{LoginPage, ProfilePage, RegisterPage};
pub use admin::AdminDashboard;
pub use book_detail::BookDetailPage;
pub use books::BooksPage;

use crate::infrastructure::AppState;
use crate::routes::{Access, ListingQuery, Route, guard};

pub enum Page {
    Books(BooksPage),
    BookDetail(BookDetailPage),
    Login(LoginPage),
    Register(RegisterPage),
    Profile(ProfilePage),
    Admin(AdminDashboard),
    /// Session restore still running for a protected route.
    Loading,
    NotFound(String),
}

impl Page {
    /// Builds the page for `route`, following guard redirects first.
    pub fn open(app: &AppState, route: Route) -> Page {
        let route = match guard(&route, &app.auth.snapshot()) {
            Access::Allowed => route,
            Access::Pending => return Page::Loading,
            Access::Redirect(to) => {
                tracing::info!("Redirecting {} -> {}", route, to);
                app.navigator.navigate(to.clone());
                to
            }
        };

        let app = app.clone();
        match route {
            Route::Home => Page::Books(BooksPage::new(app, ListingQuery::new("", 1))),
            Route::Books(listing) => Page::Books(BooksPage::new(app, listing)),
            Route::BookDetail(id) => Page::BookDetail(BookDetailPage::new(app, id)),
            Route::Login => Page::Login(LoginPage::new(app)),
            Route::Register => Page::Register(RegisterPage::new(app)),
            Route::Profile => Page::Profile(ProfilePage::new(app)),
            Route::Admin => Page::Admin(AdminDashboard::new(app)),
            Route::NotFound(path) => Page::NotFound(path),
        }
    }
}
