//! Sign in, registration and profile pages.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::ApiError;
use crate::infrastructure::AppState;
use crate::models::User;
use crate::models::user::ProfileUpdate;
use crate::routes::Route;
use crate::views::{Control, ControlAction};

/// Last error shown on a form; cleared when a submit starts.
#[derive(Clone)]
struct FormError(Arc<watch::Sender<Option<String>>>);

impl FormError {
    fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self(Arc::new(tx))
    }

    fn get(&self) -> Option<String> {
        self.0.borrow().clone()
    }

    fn track<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        let message = result.as_ref().err().map(ApiError::user_message);
        self.0.send_replace(message);
        result
    }
}

#[derive(Clone)]
pub struct LoginPage {
    app: AppState,
    error: FormError,
}

impl LoginPage {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            error: FormError::new(),
        }
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    /// Signs in and moves to the home page on success.
    pub async fn submit(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self.error.track(self.app.auth.login(email, password).await)?;
        self.app.navigator.navigate(Route::Home);
        Ok(user)
    }

    pub fn register_link(&self) -> Control {
        Control::link("Create Account", Route::Register)
    }
}

#[derive(Clone)]
pub struct RegisterPage {
    app: AppState,
    error: FormError,
}

impl RegisterPage {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            error: FormError::new(),
        }
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub async fn submit(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self
            .error
            .track(self.app.auth.register(name, email, password).await)?;
        self.app.navigator.navigate(Route::Home);
        Ok(user)
    }

    pub fn login_link(&self) -> Control {
        Control::link("Sign In", Route::Login)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileView {
    SignedIn {
        name: String,
        email: String,
        role: String,
        controls: Vec<Control>,
    },
    SignedOut {
        message: String,
        controls: Vec<Control>,
    },
}

#[derive(Clone)]
pub struct ProfilePage {
    app: AppState,
    error: FormError,
}

impl ProfilePage {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            error: FormError::new(),
        }
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn view(&self) -> ProfileView {
        match self.app.auth.snapshot() {
            state if state.is_authenticated() => {
                let Some(user) = state.user else {
                    return Self::signed_out();
                };
                ProfileView::SignedIn {
                    name: user.name,
                    email: user.email,
                    role: user.role.as_str().to_string(),
                    controls: vec![Control::Action {
                        label: "Logout".to_string(),
                        action: ControlAction::Logout,
                    }],
                }
            }
            _ => Self::signed_out(),
        }
    }

    pub async fn update(&self, fields: &ProfileUpdate) -> Result<User, ApiError> {
        self.error.track(self.app.auth.update_profile(fields).await)
    }

    pub fn logout(&self) {
        self.app.auth.logout();
        self.app.navigator.navigate(Route::Home);
    }

    fn signed_out() -> ProfileView {
        ProfileView::SignedOut {
            message: "Please log in to view your profile.".to_string(),
            controls: vec![Control::link("Login", Route::Login)],
        }
    }
}
