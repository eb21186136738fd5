//! Application routes and the guard that protects some of them.

use std::fmt;

use url::form_urlencoded;

use crate::state::auth::AuthState;

/// Search term and page number carried in the listing URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: String,
    pub page: u32,
}

impl ListingQuery {
    pub fn new(search: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into().trim().to_string(),
            page: page.max(1),
        }
    }

    pub fn parse(query: &str) -> Self {
        let mut listing = ListingQuery::new("", 1);
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "search" => listing.search = value.trim().to_string(),
                "page" => listing.page = value.parse::<u32>().unwrap_or(1).max(1),
                _ => {}
            }
        }
        listing
    }

    /// Query string without the leading `?`; defaults are left out.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        serializer.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Books(ListingQuery),
    BookDetail(String),
    Login,
    Register,
    Profile,
    Admin,
    NotFound(String),
}

impl Route {
    /// The sign-in entry point.
    pub const SIGN_IN: Route = Route::Login;

    pub fn parse(target: &str) -> Route {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["books"] => Route::Books(ListingQuery::parse(query)),
            ["books", id] => Route::BookDetail(
                urlencoding::decode(id)
                    .map(|id| id.into_owned())
                    .unwrap_or_else(|_| id.to_string()),
            ),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["profile"] => Route::Profile,
            ["admin"] => Route::Admin,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Books(query) => {
                let qs = query.to_query_string();
                if qs.is_empty() {
                    "/books".to_string()
                } else {
                    format!("/books?{}", qs)
                }
            }
            Route::BookDetail(id) => format!("/books/{}", urlencoding::encode(id)),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Profile | Route::Admin)
    }

    pub fn admin_only(&self) -> bool {
        matches!(self, Route::Admin)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of checking a route against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    /// Session restore has not settled yet; show a loader.
    Pending,
    Redirect(Route),
}

pub fn guard(route: &Route, auth: &AuthState) -> Access {
    if !route.requires_auth() {
        return Access::Allowed;
    }
    if !auth.checked {
        return Access::Pending;
    }
    if !auth.is_authenticated() {
        return Access::Redirect(Route::SIGN_IN);
    }
    if route.admin_only() && !auth.is_admin() {
        return Access::Redirect(Route::Home);
    }
    Access::Allowed
}
