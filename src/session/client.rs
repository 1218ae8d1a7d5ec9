//! Backend HTTP client with transparent session renewal.
//!
//! Every request carries the stored bearer token. When the backend answers
//! `401 Unauthorized` to a first attempt, the client asks
//! `POST {base}/auth/refresh-token` for a new token (the refresh call relies
//! on the cookie jar, not on the bearer token) and re-sends the original
//! request exactly once. A failed refresh clears the token and redirects the
//! application to [`LOGIN_ROUTE`].
//!
//! Concurrent requests that hit a 401 for the same token share one refresh:
//! the first to take the refresh guard performs it, the others find the new
//! token already stored and reuse it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{ApiRequest, ClientError, Navigator, TokenStore, LOGIN_ROUTE};
use crate::config::ApiConfig;

const REFRESH_PATH: &str = "/auth/refresh-token";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which transmission of a request is being made. A request is sent at most
/// twice: once as `First`, and once as `Retry` after a successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

/// Authenticated client for the first-party backend.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
///
/// Cookies set by the backend live in a jar owned by the client. The ones
/// the refresh call would send are mirrored into the [`TokenStore`] and
/// loaded back into the jar when a client is built, so a session cookie
/// outlives the process when the store does.
pub struct ApiClient {
    http: Client,
    base_url: String,
    refresh_url: Url,
    jar: Arc<Jar>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    refresh_guard: Mutex<()>,
}

impl ApiClient {
    /// Create a client for `base_url` with the default 30 second timeout.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidRequest`] when `base_url` is not a URL,
    /// [`ClientError::Transport`] when the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        Self::build(base_url.into(), store, navigator, DEFAULT_TIMEOUT)
    }

    pub fn from_config(
        config: &ApiConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        Self::build(
            config.base_url.clone(),
            store,
            navigator,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(
        base_url: String,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let refresh_url = Url::parse(&format!("{base_url}{REFRESH_PATH}")).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid API base URL {base_url:?}: {e}"))
        })?;

        let jar = Arc::new(Jar::default());
        if let Some(saved) = store.cookie() {
            for pair in saved.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(&format!("{pair}; Path=/"), &refresh_url);
            }
            debug!("Restored saved session cookie");
        }

        let http = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            http,
            base_url,
            refresh_url,
            jar,
            store,
            navigator,
            refresh_guard: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Send `request` with the current session token.
    ///
    /// Any HTTP response is returned as-is, except a 401 to the first
    /// attempt, which triggers one refresh and one retry. The retry's
    /// response is returned whatever its status.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] when no response was received,
    /// [`ClientError::RefreshFailed`] when the session could not be renewed.
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        let mut token = self.store.token();
        let mut attempt = Attempt::First;

        loop {
            let response = self.transmit(request, token.as_deref(), attempt).await?;

            if response.status() != StatusCode::UNAUTHORIZED || attempt == Attempt::Retry {
                return Ok(response);
            }

            debug!(
                method = %request.method(),
                path = request.path(),
                "Backend rejected session token, renewing"
            );
            token = Some(self.renew_session(token.as_deref()).await?);
            attempt = Attempt::Retry;
        }
    }

    /// Send `request` and decode a JSON success body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(self.send(request).await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Send `request` and discard a success body.
    pub async fn send_empty(&self, request: &ApiRequest) -> Result<(), ClientError> {
        Self::ensure_success(self.send(request).await?).await?;
        Ok(())
    }

    /// Send `request` without the session token and without renewal.
    ///
    /// Used for credential exchanges (login, registration) where a 401 means
    /// the credentials are wrong rather than that a token expired.
    pub async fn send_anonymous(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        self.transmit(request, None, Attempt::First).await
    }

    async fn transmit(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        attempt: Attempt,
    ) -> Result<Response, ClientError> {
        let mut headers = request.headers().clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                ClientError::InvalidRequest(format!("session token is not a valid header: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let url = request.url(&self.base_url);
        debug!(method = %request.method(), url = %url, ?attempt, "Sending backend request");

        let mut builder = self
            .http
            .request(request.method().clone(), &url)
            .headers(headers);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ClientError::Transport)?;
        self.save_cookies();
        Ok(response)
    }

    /// Mirror the cookies the refresh call would carry into the store.
    fn save_cookies(&self) {
        let Some(current) = self
            .jar
            .cookies(&self.refresh_url)
            .and_then(|v| v.to_str().ok().map(str::to_string))
        else {
            return;
        };

        if self.store.cookie().as_deref() == Some(current.as_str()) {
            return;
        }
        if let Err(e) = self.store.set_cookie(&current) {
            warn!("Failed to save session cookie: {}", e);
        }
    }

    /// Obtain a token to retry with after `stale` was rejected.
    async fn renew_session(&self, stale: Option<&str>) -> Result<String, ClientError> {
        let _guard = self.refresh_guard.lock().await;

        // A concurrent request may have settled the session while we waited.
        let current = self.store.token();
        if current.as_deref() != stale {
            return match current {
                Some(token) => {
                    debug!("Session already renewed by a concurrent request");
                    Ok(token)
                }
                None => Err(ClientError::SessionEnded),
            };
        }

        match self.request_refresh().await {
            Ok(token) => {
                // The retry still goes out with the new token if it cannot be kept.
                if let Err(e) = self.store.set_token(&token) {
                    warn!("Failed to store renewed session token: {}", e);
                }
                info!("Session renewed");
                Ok(token)
            }
            Err(err) => {
                warn!(error = %err, "Session refresh failed, signing out");
                if let Err(e) = self.store.clear() {
                    warn!("Failed to clear session token: {}", e);
                }
                self.navigator.redirect(LOGIN_ROUTE);
                Err(err)
            }
        }
    }

    async fn request_refresh(&self) -> Result<String, ClientError> {
        debug!(url = %self.refresh_url, "Requesting session refresh");

        let response = self
            .http
            .post(self.refresh_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::RefreshFailed {
                status: None,
                detail: e.to_string(),
            })?;
        self.save_cookies();

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::RefreshFailed {
                status: Some(status),
                detail: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        let body: RefreshResponse =
            response
                .json()
                .await
                .map_err(|e| ClientError::RefreshFailed {
                    status: Some(status),
                    detail: format!("malformed refresh response: {e}"),
                })?;

        if body.access_token.is_empty() {
            return Err(ClientError::RefreshFailed {
                status: Some(status),
                detail: "refresh response carried an empty token".into(),
            });
        }

        Ok(body.access_token)
    }

    /// Checks HTTP response status; returns the response on success or an
    /// error with the body text.
    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status { status, body })
    }
}
