use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owning book, either as a bare id or populated with its title
/// (the admin listing populates it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookRef {
    Id(String),
    Summary {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        title: String,
    },
}

impl BookRef {
    pub fn id(&self) -> &str {
        match self {
            BookRef::Id(id) => id,
            BookRef::Summary { id, .. } => id,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            BookRef::Id(_) => None,
            BookRef::Summary { title, .. } => Some(title),
        }
    }
}

/// Soft reference to the reviewer. The backend sends `null` once the
/// account behind a review has been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub book: Option<BookRef>,
    #[serde(default)]
    pub user: Option<ReviewAuthor>,
    pub rating: u8,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Empty when the reply carried no book.
    pub fn book_id(&self) -> &str {
        self.book.as_ref().map_or("", BookRef::id)
    }

    pub fn book_title(&self) -> Option<&str> {
        self.book.as_ref().and_then(BookRef::title)
    }

    pub fn author_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    /// Reviewer name, `None` when the author is gone or unnamed.
    pub fn author_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// Body for review create/edit. Build it through
/// [`crate::domain::validation::review_input`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewInput {
    pub rating: u8,
    pub comment: String,
}
