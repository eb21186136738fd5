//! View models derived from container state.
//!
//! Pure functions of state: they decide *what* a screen shows (loading,
//! error, empty, results) and leave drawing to the front end.

pub mod rating;

use crate::domain::policy::can_modify_review;
use crate::domain::{ErrorKind, StateError};
use crate::models::{Book, Pagination, Review, User};
use crate::routes::Route;
use crate::state::CatalogState;
use crate::state::auth::AuthState;
use crate::state::review_flow::EditorState;
use crate::utils::{format_date, truncate_text};

pub const SUMMARY_PREVIEW_CHARS: usize = 120;
pub const DEFAULT_GENRE: &str = "Fiction";
pub const COVER_PLACEHOLDER: &str = "placeholder:cover";

/// A control is one of a fixed set of kinds, chosen where it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Link { label: String, to: Route },
    Submit { label: String, disabled: bool },
    Action { label: String, action: ControlAction },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    EditReview(String),
    DeleteReview(String),
    Logout,
}

impl Control {
    pub fn link(label: &str, to: Route) -> Self {
        Control::Link {
            label: label.to_string(),
            to,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Control::Link { label, .. }
            | Control::Submit { label, .. }
            | Control::Action { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookCard {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub summary: Option<String>,
    pub cover: String,
    pub rating: f64,
    pub stars: String,
    pub num_reviews: u32,
    pub featured: bool,
}

impl From<&Book> for BookCard {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book
                .genre
                .clone()
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            summary: book
                .summary
                .as_deref()
                .map(|s| truncate_text(s, SUMMARY_PREVIEW_CHARS)),
            cover: book
                .cover_image
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| COVER_PLACEHOLDER.to_string()),
            rating: book.avg_rating,
            stars: rating::render_stars(book.avg_rating),
            num_reviews: book.num_reviews,
            featured: book.featured,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookListView {
    Loading,
    Failed(StateError),
    /// Nothing to show. `search` is set when a search produced no match.
    Empty { search: Option<String> },
    Results {
        cards: Vec<BookCard>,
        pagination: Pagination,
    },
}

impl BookListView {
    pub fn from_state(state: &CatalogState) -> Self {
        if state.list.loading {
            return BookListView::Loading;
        }
        if let Some(error) = &state.list.error {
            return BookListView::Failed(error.clone());
        }
        if state.books.is_empty() {
            let search = state
                .query
                .as_ref()
                .map(|q| q.search.trim().to_string())
                .filter(|s| !s.is_empty());
            return BookListView::Empty { search };
        }
        BookListView::Results {
            cards: state.books.iter().map(BookCard::from).collect(),
            pagination: state.pagination,
        }
    }

    pub fn heading(&self) -> String {
        match self {
            BookListView::Loading => "Loading books...".to_string(),
            BookListView::Failed(e) => format!("Error: {}", e.message),
            BookListView::Empty { search: None } => "No books available".to_string(),
            BookListView::Empty { search: Some(term) } => {
                format!("No books found matching \"{}\"", term)
            }
            BookListView::Results { pagination, .. } => {
                format!("Page {} of {} ({} books)", pagination.page, pagination.pages, pagination.total)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Loading,
    NotFound,
    Failed(StateError),
    Loaded(BookCard),
}

impl DetailView {
    pub fn from_state(state: &CatalogState, id: &str) -> Self {
        if state.detail.loading {
            return DetailView::Loading;
        }
        match (&state.book, &state.detail.error) {
            (_, Some(e)) if e.kind == ErrorKind::NotFound => DetailView::NotFound,
            (_, Some(e)) => DetailView::Failed(e.clone()),
            (Some(book), None) if book.id == id => DetailView::Loaded(BookCard::from(book)),
            _ => DetailView::NotFound,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub id: String,
    pub author: String,
    pub stars: String,
    pub comment: String,
    pub date: Option<String>,
    /// Empty unless the viewer wrote the review or is an admin.
    pub controls: Vec<Control>,
}

impl ReviewItem {
    pub fn new(review: &Review, viewer: Option<&User>) -> Self {
        let controls = if can_modify_review(viewer, review) {
            vec![
                Control::Action {
                    label: "Edit".to_string(),
                    action: ControlAction::EditReview(review.id.clone()),
                },
                Control::Action {
                    label: "Delete".to_string(),
                    action: ControlAction::DeleteReview(review.id.clone()),
                },
            ]
        } else {
            Vec::new()
        };

        Self {
            id: review.id.clone(),
            author: review.author_name().unwrap_or("Anonymous").to_string(),
            stars: rating::render_stars(f64::from(review.rating)),
            comment: review.comment.clone(),
            date: review.created_at.as_ref().map(format_date),
            controls,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewFormView {
    /// Anonymous visitors get links instead of a form.
    SignInPrompt { controls: Vec<Control> },
    Form {
        rating: i64,
        comment: String,
        error: Option<String>,
        submit: Control,
    },
}

impl ReviewFormView {
    pub fn new(auth: &AuthState, editor: &EditorState) -> Self {
        if !auth.is_authenticated() {
            return ReviewFormView::SignInPrompt {
                controls: vec![
                    Control::link("Sign In", Route::Login),
                    Control::link("Create Account", Route::Register),
                ],
            };
        }
        let submitting = editor.phase == crate::state::review_flow::Phase::Submitting;
        ReviewFormView::Form {
            rating: editor.draft.rating,
            comment: editor.draft.comment.clone(),
            error: editor.error.clone(),
            submit: Control::Submit {
                label: if submitting { "Submitting..." } else { "Submit Review" }.to_string(),
                disabled: !editor.can_submit(),
            },
        }
    }
}
