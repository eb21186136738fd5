//! Thin wrapper around `reqwest` shared by every service module.
//!
//! It owns three concerns: resolving paths against the configured base URL,
//! attaching the session token as a bearer credential, and turning non-2xx
//! responses into [`ApiError`]. A 401 on a request that carried a token ends
//! that session and sends the user to the sign-in route, once.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

use crate::config::Config;
use crate::domain::{ApiError, ValidationError};
use crate::infrastructure::navigator::Navigator;
use crate::routes::Route;

const USER_AGENT: &str = concat!("bookreview/", env!("CARGO_PKG_VERSION"));

/// Read access to the current session token, plus the one write the HTTP
/// layer is allowed: ending the session the backend just rejected.
pub trait SessionToken: Send + Sync {
    fn current(&self) -> Option<String>;

    /// Ends the session if `token` is still the active one.
    /// Returns `true` only for the call that actually ended it.
    fn invalidate(&self, token: &str) -> bool;
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionToken>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &Config,
        session: Arc<dyn SessionToken>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, &[], None::<&()>).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send(Method::GET, path, query, None::<&()>).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PATCH, path, &[], Some(body)).await
    }

    /// DELETE; whatever the backend answers on success is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self.send(Method::DELETE, path, &[], None::<&()>).await?;
        Ok(())
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let token = self.session.current();

        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!("{} {} (authorized: {})", method, url, token.is_some());

        let resp = request
            .send()
            .await
            .inspect_err(|e| tracing::warn!("{} {} failed: {}", method, path, e))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .inspect_err(|e| tracing::warn!("{} {} body unreadable: {}", method, path, e))?;

        if status.is_success() {
            return decode_body(path, &bytes);
        }

        let error = normalize_error(status, &bytes);
        tracing::info!("{} {} -> {} ({})", method, path, status.as_u16(), error);

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(token.as_deref());
        }

        Err(error)
    }

    fn handle_unauthorized(&self, token_used: Option<&str>) {
        // An anonymous 401 (bad credentials on the login form) is not an expiry
        let Some(token) = token_used else {
            return;
        };
        // Only the request that ended the session redirects
        if !self.session.invalidate(token) {
            return;
        }
        if self.navigator.current() == Route::SIGN_IN {
            return;
        }
        tracing::warn!("Session rejected by the backend, redirecting to sign in");
        self.navigator.navigate(Route::SIGN_IN);
    }
}

fn decode_body<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<T, ApiError> {
    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(raw).map_err(|e| ApiError::Decode(format!("Parse error for {}: {}", path, e)))
}

/// Reads `{ message | error, code }` out of an error body, falling back to
/// the status reason when the body says nothing useful.
pub(crate) fn normalize_error(status: StatusCode, bytes: &[u8]) -> ApiError {
    let parsed: Option<Value> = serde_json::from_slice(bytes).ok();

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("error")))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    let code = parsed.as_ref().and_then(|v| v.get("code")).map(|c| match c {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized { message, code },
        StatusCode::FORBIDDEN => ApiError::Forbidden { message, code },
        StatusCode::NOT_FOUND => ApiError::NotFound { message, code },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY if code.is_none() => {
            ApiError::Validation(ValidationError::Invalid(message))
        }
        s if s.is_client_error() => ApiError::Rejected {
            status: s.as_u16(),
            message,
            code,
        },
        s => ApiError::Server {
            status: s.as_u16(),
            message,
            code,
        },
    }
}
