#![allow(dead_code)]

use std::sync::Arc;

use bookreview::config::Config;
use bookreview::infrastructure::{AppState, History, MemoryTokenStore};
use bookreview::routes::Route;
use serde_json::{Value, json};
use wiremock::MockServer;

pub struct TestApp {
    pub server: MockServer,
    pub app: AppState,
    pub history: Arc<History>,
    pub store: Arc<MemoryTokenStore>,
}

pub async fn setup(token: Option<&str>) -> TestApp {
    setup_at(token, Route::Home).await
}

pub async fn setup_at(token: Option<&str>, start: Route) -> TestApp {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let config = Config::from_lookup(|key| match key {
        "API_BASE_URL" => Some(base.clone()),
        "REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    });

    let store = Arc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::default(),
    });
    let history = Arc::new(History::new(start));
    let app = AppState::with_parts(config, store.clone(), history.clone())
        .expect("Failed to build app state");

    TestApp {
        server,
        app,
        history,
        store,
    }
}

pub fn user_json(id: &str, name: &str, role: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": role
    })
}

pub fn auth_json(id: &str, name: &str, role: &str, token: &str) -> Value {
    let mut body = user_json(id, name, role);
    body["token"] = json!(token);
    body
}

pub fn book_json(id: &str, title: &str, avg_rating: f64, num_reviews: u32) -> Value {
    json!({
        "_id": id,
        "title": title,
        "author": "Frank Herbert",
        "genre": "Science Fiction",
        "avgRating": avg_rating,
        "numReviews": num_reviews
    })
}

pub fn page_json(books: Vec<Value>, page: u32, pages: u32, total: u64) -> Value {
    json!({ "books": books, "page": page, "pages": pages, "total": total })
}

pub fn review_json(id: &str, book_id: &str, user_id: &str, rating: u8, comment: &str) -> Value {
    json!({
        "_id": id,
        "book": book_id,
        "user": { "_id": user_id, "name": "Ana" },
        "rating": rating,
        "comment": comment,
        "createdAt": "2024-03-05T10:00:00Z"
    })
}

/// Signs in through the login endpoint and returns the token used.
pub async fn sign_in(t: &TestApp, id: &str, name: &str, role: &str) -> String {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    let token = format!("token-{}", id);
    let email = format!("{}@example.com", name.to_lowercase());
    let _guard = Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json(id, name, role, &token)))
        .mount_as_scoped(&t.server)
        .await;
    t.app
        .auth
        .login(&email, "password")
        .await
        .expect("Failed to sign in");
    token
}
