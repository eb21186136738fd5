//! Domain error types
//!
//! Every service-layer failure is normalized into [`ApiError`] before it
//! reaches a state container. Containers turn it into a [`StateError`] that
//! views can render without knowing about HTTP.

use thiserror::Error;

const SERVER_TROUBLE: &str = "Something went wrong on our side. Please try again in a moment.";
const NETWORK_TROUBLE: &str = "Unable to reach the server. Check your connection and try again.";

/// Coarse failure category, used by views to pick what to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input refused, by the client before sending or by the backend (4xx)
    Validation,
    /// 401: session missing or expired
    Unauthorized,
    /// 403: signed in but not allowed
    Forbidden,
    /// 404
    NotFound,
    /// 5xx, transport failure or an unreadable body
    Unavailable,
}

/// Client-side validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Please enter a comment")]
    EmptyComment,
    #[error("Rating must be a whole number between 1 and 5, got {0}")]
    RatingOutOfRange(i64),
    #[error("{0}")]
    Invalid(String),
}

/// Normalized service-layer error.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Unauthorized {
        message: String,
        code: Option<String>,
    },

    #[error("{message}")]
    Forbidden {
        message: String,
        code: Option<String>,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        code: Option<String>,
    },

    /// Any other 4xx: the backend refused the input
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("server error {status}: {message}")]
    Server {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) | ApiError::Rejected { .. } => ErrorKind::Validation,
            ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::Forbidden { .. } => ErrorKind::Forbidden,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Server { .. } | ApiError::Network(_) | ApiError::Decode(_) => {
                ErrorKind::Unavailable
            }
        }
    }

    /// Backend-provided error code, when there was one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { code, .. }
            | ApiError::Forbidden { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Rejected { code, .. }
            | ApiError::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Text to put in front of a person.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { .. } | ApiError::Decode(_) => SERVER_TROUBLE.to_string(),
            ApiError::Network(_) => NETWORK_TROUBLE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
            code: None,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden {
            message: message.into(),
            code: None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Error as held by a state container: what views render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ApiError> for StateError {
    fn from(e: &ApiError) -> Self {
        Self {
            kind: e.kind(),
            message: e.user_message(),
        }
    }
}

impl From<ApiError> for StateError {
    fn from(e: ApiError) -> Self {
        StateError::from(&e)
    }
}
